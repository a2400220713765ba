//! Epoch lifecycle types for the OpenForecast scoring model.
//!
//! Each epoch moves through three forward-only states:
//! **ACTIVE → PENDING_FINALIZE → FINALIZED**
//!
//! During ACTIVE, authorized market contracts report scores and contribute
//! to the epoch's isolated pool. Once the deadline passes (evaluated
//! lazily, on the next relevant call) the epoch becomes PENDING_FINALIZE
//! and waits for a verified leaderboard submission within the grace
//! window. FINALIZED is terminal — reached through a verified submission
//! or through the recovery path, never both.

use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{EpochId, constants};

/// The three forward-only states of a scoring epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpochStatus {
    /// Accepting score reports and pool contributions.
    Active,
    /// Deadline passed; awaiting a verified leaderboard submission.
    PendingFinalize,
    /// Terminal: distributed (or recovered) and closed forever.
    Finalized,
}

impl EpochStatus {
    /// Whether this status can still transition.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Finalized
    }

    /// Whether `next` is a legal forward transition from `self`.
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Active, Self::PendingFinalize) | (Self::PendingFinalize, Self::Finalized)
        )
    }
}

impl fmt::Display for EpochStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::PendingFinalize => write!(f, "PENDING_FINALIZE"),
            Self::Finalized => write!(f, "FINALIZED"),
        }
    }
}

// ---------------------------------------------------------------------------
// EpochConfig
// ---------------------------------------------------------------------------

/// Timing configuration for the epoch state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochConfig {
    /// Nominal epoch duration (deadline = start + duration).
    pub duration: Duration,
    /// Grace window after the deadline during which a leaderboard
    /// submission is still accepted before recovery becomes eligible.
    pub grace_window: Duration,
}

impl Default for EpochConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(constants::DEFAULT_EPOCH_DURATION_SECS),
            grace_window: Duration::from_secs(constants::DEFAULT_GRACE_WINDOW_SECS),
        }
    }
}

impl EpochConfig {
    /// The reporting deadline for an epoch started at `start`.
    #[must_use]
    pub fn deadline(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        start + self.duration
    }

    /// The last instant at which a leaderboard submission is accepted.
    #[must_use]
    pub fn grace_deadline(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        start + self.duration + self.grace_window
    }
}

// ---------------------------------------------------------------------------
// EpochRecord
// ---------------------------------------------------------------------------

/// Per-epoch ledger entry.
///
/// The `pool` is funded only by contributions made while this epoch was
/// active and spent only by this epoch's own distribution — pools of
/// different epochs never mix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochRecord {
    /// Strictly increasing epoch number.
    pub id: EpochId,
    /// When this epoch opened.
    pub start_time: DateTime<Utc>,
    /// Lifecycle status (forward-only).
    pub status: EpochStatus,
    /// Isolated contribution pool balance still held for this epoch.
    pub pool: Decimal,
    /// Amount already paid out of this epoch's pool.
    pub distributed: Decimal,
    /// Set once rewards have been paid (verified or manual).
    pub is_distributed: bool,
    /// Set when the epoch was finalized through the recovery path
    /// without distribution; gates manual distribution.
    pub recovered: bool,
}

impl EpochRecord {
    /// Open a fresh ACTIVE epoch with an empty pool.
    #[must_use]
    pub fn open(id: EpochId, start_time: DateTime<Utc>) -> Self {
        Self {
            id,
            start_time,
            status: EpochStatus::Active,
            pool: Decimal::ZERO,
            distributed: Decimal::ZERO,
            is_distributed: false,
            recovered: false,
        }
    }

    /// Funds still held for this epoch.
    #[must_use]
    pub fn remaining_pool(&self) -> Decimal {
        self.pool
    }

    /// The reporting deadline under `config`.
    #[must_use]
    pub fn deadline(&self, config: &EpochConfig) -> DateTime<Utc> {
        config.deadline(self.start_time)
    }

    /// The end of the submission grace window under `config`.
    #[must_use]
    pub fn grace_deadline(&self, config: &EpochConfig) -> DateTime<Utc> {
        config.grace_deadline(self.start_time)
    }
}
