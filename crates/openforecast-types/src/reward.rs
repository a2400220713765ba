//! The reward percentage table.
//!
//! Exactly ten basis-point weights, one per ranked trader slot. Any
//! accepted table sums to exactly 10,000 bps (100%); floor rounding of
//! individual shares leaves dust in the epoch pool.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ForecastError, Result, constants};

/// Basis-point reward weights for ranks 1..=10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTable([u16; constants::REWARD_SLOTS]);

impl RewardTable {
    /// Validate and construct a table. The weights must sum to exactly
    /// 10,000 bps.
    ///
    /// # Errors
    /// Returns [`ForecastError::InvalidRewardTable`] otherwise.
    pub fn new(weights: [u16; constants::REWARD_SLOTS]) -> Result<Self> {
        let sum: u32 = weights.iter().map(|&w| u32::from(w)).sum();
        if sum != u32::from(constants::BPS_DENOMINATOR) {
            return Err(ForecastError::InvalidRewardTable { sum });
        }
        Ok(Self(weights))
    }

    /// Basis points awarded to the 1-based `rank`, zero past slot ten.
    #[must_use]
    pub fn bps_for_rank(&self, rank: u32) -> u16 {
        let idx = rank.checked_sub(1).map(|i| i as usize);
        match idx {
            Some(i) if i < constants::REWARD_SLOTS => self.0[i],
            _ => 0,
        }
    }

    /// Floor share of `pool` for the 1-based `rank`:
    /// `floor(pool × bps / 10000)`.
    #[must_use]
    pub fn share_of(&self, pool: Decimal, rank: u32) -> Decimal {
        let bps = Decimal::from(self.bps_for_rank(rank));
        (pool * bps / Decimal::from(constants::BPS_DENOMINATOR)).floor()
    }

    /// The raw weights.
    #[must_use]
    pub fn weights(&self) -> &[u16; constants::REWARD_SLOTS] {
        &self.0
    }
}

impl Default for RewardTable {
    /// The production table: 25% / 18% / 15% / 10% / 8% / 7% / 6% / 5% /
    /// 4% / 2% for ranks one through ten.
    fn default() -> Self {
        Self([2500, 1800, 1500, 1000, 800, 700, 600, 500, 400, 200])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_sums_to_10000() {
        let table = RewardTable::default();
        let sum: u32 = table.weights().iter().map(|&w| u32::from(w)).sum();
        assert_eq!(sum, 10_000);
    }

    #[test]
    fn uniform_table_accepted() {
        assert!(RewardTable::new([1000; 10]).is_ok());
    }

    #[test]
    fn short_sum_rejected() {
        let err = RewardTable::new([999; 10]).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidRewardTable { sum: 9_990 }));
    }

    #[test]
    fn over_sum_rejected() {
        let mut weights = [1000u16; 10];
        weights[0] = 1001;
        let err = RewardTable::new(weights).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidRewardTable { sum: 10_001 }));
    }

    #[test]
    fn bps_for_rank_bounds() {
        let table = RewardTable::default();
        assert_eq!(table.bps_for_rank(1), 2500);
        assert_eq!(table.bps_for_rank(10), 200);
        assert_eq!(table.bps_for_rank(11), 0);
        assert_eq!(table.bps_for_rank(0), 0);
    }

    #[test]
    fn share_of_is_floor() {
        let table = RewardTable::default();
        let pool = Decimal::new(10_000, 0);
        assert_eq!(table.share_of(pool, 1), Decimal::new(2_500, 0));
        assert_eq!(table.share_of(pool, 10), Decimal::new(200, 0));

        // 999 × 2500 / 10000 = 249.75 → floors to 249.
        let pool = Decimal::new(999, 0);
        assert_eq!(table.share_of(pool, 1), Decimal::new(249, 0));
    }

    #[test]
    fn full_table_never_exceeds_pool() {
        let table = RewardTable::default();
        let pool = Decimal::new(9_999, 0);
        let total: Decimal = (1..=10).map(|rank| table.share_of(pool, rank)).sum();
        assert!(total <= pool);
    }

    #[test]
    fn table_serde_roundtrip() {
        let table = RewardTable::default();
        let json = serde_json::to_string(&table).unwrap();
        let back: RewardTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
