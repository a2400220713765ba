//! Leaderboard submission verification.
//!
//! The ranking itself is computed off-chain by the trusted submitter; the
//! engine never trusts it. Verification re-derives the ground truth per
//! address from the ledger and accepts the ranking only if every value
//! matches and the ordering is provably non-increasing. The checks are
//! strictly value-by-value — no aggregate hash — and a single bad entry
//! rejects the whole call.

use std::collections::HashSet;

use openforecast_ledger::EpochLedger;
use openforecast_types::{
    Address, EpochId, ForecastError, Result, Role, TopPerformer, constants,
};
use serde::{Deserialize, Serialize};

/// An externally computed ranking for one epoch, in wire shape:
/// pairwise arrays of addresses and their claimed point totals, sorted
/// non-increasing by points.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaderboardSubmission {
    /// Trader addresses, best first.
    pub ranked_traders: Vec<Address>,
    /// Claimed trader point totals, parallel to `ranked_traders`.
    pub trader_points: Vec<u128>,
    /// Creator addresses, best first.
    pub ranked_creators: Vec<Address>,
    /// Claimed creator point totals, parallel to `ranked_creators`.
    pub creator_points: Vec<u128>,
}

impl LeaderboardSubmission {
    /// The verified trader entries as storable records.
    #[must_use]
    pub fn trader_performers(&self) -> Vec<TopPerformer> {
        zip_performers(&self.ranked_traders, &self.trader_points)
    }

    /// The verified creator entries as storable records.
    #[must_use]
    pub fn creator_performers(&self) -> Vec<TopPerformer> {
        zip_performers(&self.ranked_creators, &self.creator_points)
    }
}

fn zip_performers(addresses: &[Address], points: &[u128]) -> Vec<TopPerformer> {
    addresses
        .iter()
        .zip(points)
        .map(|(address, pts)| TopPerformer {
            address: *address,
            points: *pts,
        })
        .collect()
}

/// Verify a submission against ledger truth for `epoch`.
///
/// # Errors
/// - [`ForecastError::LengthMismatch`] for unpaired arrays
/// - [`ForecastError::TooManyEntries`] past the per-role cap
/// - [`ForecastError::DuplicateLeaderboardEntry`] for a repeated address
/// - [`ForecastError::UnsortedLeaderboard`] for a non-monotone list
/// - [`ForecastError::ScoreMismatch`] when a claimed value differs from
///   the recorded one
pub fn verify(
    submission: &LeaderboardSubmission,
    ledger: &EpochLedger,
    epoch: EpochId,
) -> Result<()> {
    verify_role_list(
        &submission.ranked_traders,
        &submission.trader_points,
        ledger,
        epoch,
        Role::Trader,
    )?;
    verify_role_list(
        &submission.ranked_creators,
        &submission.creator_points,
        ledger,
        epoch,
        Role::Creator,
    )
}

fn verify_role_list(
    addresses: &[Address],
    points: &[u128],
    ledger: &EpochLedger,
    epoch: EpochId,
    role: Role,
) -> Result<()> {
    if addresses.len() != points.len() {
        return Err(ForecastError::LengthMismatch {
            addresses: addresses.len(),
            points: points.len(),
        });
    }
    if addresses.len() > constants::MAX_LEADERBOARD_ENTRIES {
        return Err(ForecastError::TooManyEntries {
            count: addresses.len(),
            max: constants::MAX_LEADERBOARD_ENTRIES,
        });
    }

    let mut seen: HashSet<Address> = HashSet::with_capacity(addresses.len());
    for (index, (address, &submitted)) in addresses.iter().zip(points).enumerate() {
        if !seen.insert(*address) {
            return Err(ForecastError::DuplicateLeaderboardEntry(*address));
        }
        if index > 0 && points[index - 1] < submitted {
            return Err(ForecastError::UnsortedLeaderboard { index });
        }
        let recorded = ledger.recorded_score(epoch, *address, role);
        if submitted != recorded {
            return Err(ForecastError::ScoreMismatch {
                address: *address,
                submitted,
                recorded,
            });
        }
    }
    Ok(())
}
