//! Creator Forecast Point formula.

use openforecast_types::CreatorEvent;
use openforecast_types::constants::{
    CREATOR_ACTIVITY_BONUS_PER_TRADE, CREATOR_BASE_FP, CREATOR_VOLUME_BONUS_PER_UNIT,
};

/// Forecast Points awarded for one reported market-creation event:
/// a flat base plus linear volume and activity bonuses.
#[must_use]
pub fn creator_points(event: &CreatorEvent) -> u128 {
    let points = CREATOR_BASE_FP
        .saturating_add(volume_bonus(event.volume))
        .saturating_add(activity_bonus(event.trade_count));

    tracing::debug!(
        creator = %event.creator,
        market = %event.market,
        points,
        "computed creator points"
    );
    points
}

/// Linear volume bonus: 0.01 FP per whole unit of traded volume.
#[must_use]
pub fn volume_bonus(volume: u128) -> u128 {
    volume.saturating_mul(CREATOR_VOLUME_BONUS_PER_UNIT)
}

/// Linear activity bonus: 0.1 FP per executed trade.
#[must_use]
pub fn activity_bonus(trade_count: u64) -> u128 {
    u128::from(trade_count).saturating_mul(CREATOR_ACTIVITY_BONUS_PER_TRADE)
}
