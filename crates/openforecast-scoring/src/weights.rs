//! The three fixed-point score multipliers.
//!
//! All functions are total: zero divisors are pre-empted by explicit
//! checks that return the documented floor or ceiling instead of erroring.
//! Values are fixed point with `FP_UNIT` (1,000,000) representing 1.0.

use std::time::Duration;

use chrono::{DateTime, Utc};
use openforecast_types::constants::{
    FP_UNIT, MARKET_WEIGHT_CEILING_VOLUME, MAX_CORRECTNESS_MULTIPLIER, MAX_EARLY_BONUS,
    MAX_MARKET_WEIGHT, MIN_MARKET_WEIGHT,
};

/// Market-size weight: linear ramp from 0.5× at zero volume to 2.0× at
/// [`MARKET_WEIGHT_CEILING_VOLUME`] units, clipped at the ceiling.
#[must_use]
pub fn market_size_weight(volume: u128) -> u128 {
    if volume == 0 {
        return MIN_MARKET_WEIGHT;
    }
    let ramp = MAX_MARKET_WEIGHT - MIN_MARKET_WEIGHT;
    let weight = MIN_MARKET_WEIGHT
        + volume
            .saturating_mul(ramp)
            .checked_div(MARKET_WEIGHT_CEILING_VOLUME)
            .unwrap_or(0);
    weight.min(MAX_MARKET_WEIGHT)
}

/// Early-position bonus: 2.0× for positions opened at or before market
/// creation, 1.0× at or after `creation + duration`, linearly
/// interpolated on the elapsed fraction in between.
#[must_use]
pub fn early_bonus(
    position_time: DateTime<Utc>,
    creation_time: DateTime<Utc>,
    duration: Duration,
) -> u128 {
    if position_time <= creation_time {
        return MAX_EARLY_BONUS;
    }
    let duration_secs = duration.as_secs();
    if duration_secs == 0 {
        return FP_UNIT;
    }
    let elapsed_secs = (position_time - creation_time)
        .num_seconds()
        .unsigned_abs();
    if elapsed_secs >= duration_secs {
        return FP_UNIT;
    }
    MAX_EARLY_BONUS - FP_UNIT * u128::from(elapsed_secs) / u128::from(duration_secs)
}

/// Correctness multiplier: `1.0 + (1.0 − correct_share)`, rewarding
/// positions taken against the consensus, clipped at 2.0×. A market with
/// zero total liquidity yields the 1.0× floor.
#[must_use]
pub fn correctness_multiplier(correct_side_liquidity: u128, total_liquidity: u128) -> u128 {
    if total_liquidity == 0 {
        return FP_UNIT;
    }
    let correct_share = correct_side_liquidity
        .saturating_mul(FP_UNIT)
        .checked_div(total_liquidity)
        .unwrap_or(FP_UNIT)
        .min(FP_UNIT);
    (FP_UNIT + (FP_UNIT - correct_share)).min(MAX_CORRECTNESS_MULTIPLIER)
}
