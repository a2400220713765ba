//! Trader Forecast Point composition.

use openforecast_types::TraderEvent;
use openforecast_types::constants::FP_UNIT;

use crate::weights::{correctness_multiplier, early_bonus, market_size_weight};

/// Forecast Points awarded for one reported trading event:
///
/// ```text
/// FP = position_size × market_size_weight × early_bonus × correctness
/// ```
///
/// The three multipliers are composed in fixed point and the product is
/// rescaled once by `FP_UNIT³`. The result is itself fixed point, so a
/// position of size 1 with all multipliers at 1.0 yields `FP_UNIT` points.
#[must_use]
pub fn trader_points(event: &TraderEvent) -> u128 {
    let weight = market_size_weight(event.volume);
    let bonus = early_bonus(event.position_time, event.creation_time, event.duration);
    let multiplier =
        correctness_multiplier(event.correct_side_liquidity, event.total_liquidity);

    let points = event
        .position_size
        .saturating_mul(FP_UNIT)
        .saturating_mul(weight)
        .saturating_mul(bonus)
        .saturating_mul(multiplier)
        / (FP_UNIT * FP_UNIT * FP_UNIT);

    tracing::debug!(
        user = %event.user,
        market = %event.market,
        weight,
        bonus,
        multiplier,
        points,
        "computed trader points"
    );
    points
}
