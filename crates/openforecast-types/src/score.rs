//! Score-reporting payloads and stored ranking records.
//!
//! Market contracts report [`TraderEvent`] / [`CreatorEvent`] facts; the
//! engine converts them into Forecast Points. [`TopPerformer`] entries are
//! written exactly once at epoch finalization and are read-only afterward.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, MarketId, PayoutId};

/// A trading fact reported by an authorized market contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraderEvent {
    /// The trader who opened the position.
    pub user: Address,
    /// The market the position was opened in.
    pub market: MarketId,
    /// Total traded volume of the market, in whole units.
    pub volume: u128,
    /// When the position was opened.
    pub position_time: DateTime<Utc>,
    /// When the market was created.
    pub creation_time: DateTime<Utc>,
    /// The market's nominal duration; positions opened after
    /// `creation_time + duration` earn no early bonus.
    pub duration: Duration,
    /// Liquidity on the side that resolved correct, in whole units.
    pub correct_side_liquidity: u128,
    /// Total liquidity across both sides, in whole units.
    pub total_liquidity: u128,
    /// Size of the trader's position, in whole units.
    pub position_size: u128,
}

/// A market-creation fact reported by an authorized market contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorEvent {
    /// The account that created the market.
    pub creator: Address,
    /// The market being credited.
    pub market: MarketId,
    /// Total traded volume of the market, in whole units.
    pub volume: u128,
    /// Number of trades executed in the market.
    pub trade_count: u64,
}

/// One ranked entry stored per epoch per role at finalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopPerformer {
    /// The ranked participant.
    pub address: Address,
    /// The verified Forecast Point total (fixed point).
    pub points: u128,
}

/// A single reward transfer out of an epoch's pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// Deterministic audit identifier for this payout.
    pub id: PayoutId,
    /// The rewarded address.
    pub address: Address,
    /// Leaderboard rank, 1-based.
    pub rank: u32,
    /// Amount paid, floor-rounded from the basis-point share.
    pub amount: Decimal,
}
