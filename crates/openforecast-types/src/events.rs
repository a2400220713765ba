//! Engine notifications — the observable side-effect stream.
//!
//! Every state transition that external auditors care about (epoch closes,
//! submissions, distributions, role changes) appends an [`EngineEvent`] to
//! the engine's log, carrying the relevant epoch number and amounts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Address, EpochId};

/// An observable engine notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// An epoch crossed its deadline and stopped accepting reports.
    EpochClosed { epoch: EpochId },
    /// A new epoch opened and became the current one.
    EpochOpened { epoch: EpochId, start_time: DateTime<Utc> },
    /// Funds were added to the active epoch's isolated pool.
    PoolContribution {
        epoch: EpochId,
        from: Address,
        amount: Decimal,
    },
    /// A leaderboard passed verification and was stored.
    LeaderboardSubmitted {
        epoch: EpochId,
        trader_entries: usize,
        creator_entries: usize,
    },
    /// An epoch's pool was distributed to its top traders.
    /// `backdated` marks a past (non-current) epoch paid during catch-up.
    RewardsDistributed {
        epoch: EpochId,
        total: Decimal,
        backdated: bool,
    },
    /// An epoch was finalized through the recovery path, pool preserved.
    EmergencyFinalized { epoch: EpochId, pool: Decimal },
    /// The owner manually distributed part of a recovered epoch's pool.
    ManualDistribution { epoch: EpochId, total: Decimal },
    /// The owner swept all remaining pools out of the engine.
    EmergencyWithdrawal { total: Decimal },
    /// The trusted leaderboard submitter changed.
    SubmitterChanged { submitter: Address },
    /// The authorizing factory changed.
    FactoryChanged { factory: Address },
    /// An address was added to or removed from the authorized-caller set.
    CallerAuthorized { caller: Address, enabled: bool },
    /// The reward percentage table was replaced.
    RewardTableUpdated,
}
