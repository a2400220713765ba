//! Reward distribution math.
//!
//! Pure: given an isolated pool, the percentage table, and the verified
//! trader ranking, compute the payout list. Each of the top ten ranks
//! receives `floor(pool × bps / 10000)`; the floor dust stays in the
//! pool and is never reallocated.

use openforecast_types::{Address, EpochId, Payout, PayoutId, RewardTable, Role, constants};
use rust_decimal::Decimal;

/// Compute the payouts for the top ranked traders of `epoch`.
///
/// Ranks past the table's ten slots receive nothing, as do ranks whose
/// floor share is zero; such entries are omitted from the result.
#[must_use]
pub fn compute_payouts(
    pool: Decimal,
    table: &RewardTable,
    ranked_traders: &[Address],
    epoch: EpochId,
) -> Vec<Payout> {
    ranked_traders
        .iter()
        .take(constants::REWARD_SLOTS)
        .enumerate()
        .filter_map(|(index, address)| {
            let rank = u32::try_from(index + 1).ok()?;
            let amount = table.share_of(pool, rank);
            if amount <= Decimal::ZERO {
                return None;
            }
            Some(Payout {
                id: PayoutId::deterministic(epoch, Role::Trader, rank),
                address: *address,
                rank,
                amount,
            })
        })
        .collect()
}

/// Total amount of a payout set.
#[must_use]
pub fn payout_total(payouts: &[Payout]) -> Decimal {
    payouts.iter().map(|p| p.amount).sum()
}
