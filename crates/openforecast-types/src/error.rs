//! Error types for the OpenForecast engine.
//!
//! All errors use the `OF_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Authorization errors
//! - 2xx: Epoch state errors
//! - 3xx: Validation errors
//! - 4xx: Funds errors
//! - 9xx: General / internal errors
//!
//! Every check is a precondition evaluated before any mutation: a failed
//! call aborts with one of these errors and leaves engine state untouched.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{Address, EpochId, EpochStatus};

/// Central error enum for all OpenForecast operations.
#[derive(Debug, Error)]
pub enum ForecastError {
    // =================================================================
    // Authorization Errors (1xx)
    // =================================================================
    /// The caller is not the owning operator.
    #[error("OF_ERR_100: Caller {0} is not the owner")]
    NotOwner(Address),

    /// The caller is not the designated leaderboard submitter.
    #[error("OF_ERR_101: Caller {0} is not the leaderboard submitter")]
    NotSubmitter(Address),

    /// The caller is not in the authorized-caller set.
    #[error("OF_ERR_102: Caller {0} is not an authorized market contract")]
    NotAuthorizedCaller(Address),

    /// The caller is not the designated factory.
    #[error("OF_ERR_103: Caller {0} is not the market factory")]
    NotFactory(Address),

    /// Only code-bearing addresses may join the authorized-caller set.
    #[error("OF_ERR_104: Address {0} is not a contract")]
    NotContractAddress(Address),

    // =================================================================
    // Epoch State Errors (2xx)
    // =================================================================
    /// The requested epoch has never existed.
    #[error("OF_ERR_200: Epoch not found: {0}")]
    EpochNotFound(EpochId),

    /// The epoch is in the wrong status for this operation.
    #[error("OF_ERR_201: Wrong epoch status for {epoch}: expected {expected}, got {actual}")]
    WrongEpochStatus {
        epoch: EpochId,
        expected: EpochStatus,
        actual: EpochStatus,
    },

    /// The epoch's deadline has not passed yet.
    #[error("OF_ERR_202: Epoch {0} has not reached its deadline")]
    EpochNotOver(EpochId),

    /// The grace window has elapsed; submissions are no longer accepted.
    #[error("OF_ERR_203: Submission window closed for {0}")]
    SubmissionWindowClosed(EpochId),

    /// Recovery requires the grace window to have fully elapsed.
    #[error("OF_ERR_204: Grace window still open for {0}")]
    GraceWindowNotElapsed(EpochId),

    /// The epoch's pool has already been distributed.
    #[error("OF_ERR_205: Rewards already distributed for {0}")]
    AlreadyDistributed(EpochId),

    /// The current epoch is awaiting finalization; reports and
    /// contributions are rejected until the next epoch opens.
    #[error("OF_ERR_206: Epoch {0} is awaiting finalization and accepts no reports")]
    EpochNotAccepting(EpochId),

    /// Manual distribution only applies to epochs finalized via recovery.
    #[error("OF_ERR_207: Epoch {0} was not finalized through the recovery path")]
    NotRecoveryFinalized(EpochId),

    // =================================================================
    // Validation Errors (3xx)
    // =================================================================
    /// Ranked-address and point arrays differ in length.
    #[error("OF_ERR_300: Length mismatch: {addresses} addresses vs {points} point values")]
    LengthMismatch { addresses: usize, points: usize },

    /// A submitted list exceeds the per-role entry cap.
    #[error("OF_ERR_301: Too many leaderboard entries: {count} (max {max})")]
    TooManyEntries { count: usize, max: usize },

    /// A submitted list is not sorted non-increasing by points.
    #[error("OF_ERR_302: Leaderboard not sorted non-increasing at index {index}")]
    UnsortedLeaderboard { index: usize },

    /// A submitted score does not equal the ledger's recorded truth.
    #[error(
        "OF_ERR_303: Score mismatch for {address}: submitted {submitted}, recorded {recorded}"
    )]
    ScoreMismatch {
        address: Address,
        submitted: u128,
        recorded: u128,
    },

    /// The same address appears twice in one submitted list.
    #[error("OF_ERR_304: Duplicate leaderboard entry: {0}")]
    DuplicateLeaderboardEntry(Address),

    /// Reward table basis points must sum to exactly 10,000.
    #[error("OF_ERR_305: Invalid reward table: percentages sum to {sum}, expected 10000")]
    InvalidRewardTable { sum: u32 },

    /// Batch submissions must cover chronologically consecutive epochs.
    #[error("OF_ERR_306: Non-consecutive batch epochs: {next} does not follow {previous}")]
    NonConsecutiveEpochs { previous: EpochId, next: EpochId },

    /// A batch submission carried no epochs.
    #[error("OF_ERR_307: Empty batch submission")]
    EmptyBatch,

    /// A batch submission exceeds the catch-up cap.
    #[error("OF_ERR_308: Batch of {count} epochs exceeds maximum {max}")]
    BatchTooLarge { count: usize, max: usize },

    // =================================================================
    // Funds Errors (4xx)
    // =================================================================
    /// A requested distribution exceeds the epoch's remaining pool.
    #[error("OF_ERR_400: Insufficient pool: requested {requested}, available {available}")]
    InsufficientPool {
        requested: Decimal,
        available: Decimal,
    },

    /// Pool contributions must be positive.
    #[error("OF_ERR_401: Contribution amount must be positive")]
    ZeroContribution,

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("OF_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, ForecastError>;
