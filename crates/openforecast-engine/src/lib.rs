//! # openforecast-engine
//!
//! **Finality Plane**: leaderboard submission verification, reward
//! distribution, and recovery.
//!
//! ## Architecture
//!
//! The finality plane composes the state plane and the compute plane into
//! the single [`ForecastEngine`] orchestrator:
//! 1. **Submission protocol**: the off-chain submitter proves a ranking;
//!    the engine re-derives every value from the ledger and accepts only a
//!    fully matching, non-increasing list
//! 2. **Distributor**: pays the top ten trader slots
//!    `floor(pool × bps / 10000)` each from the epoch's isolated pool
//! 3. **Recovery controller**: emergency finalization (no funds moved) and
//!    manual distribution once the grace window has elapsed unanswered
//!
//! ## Finalization Flow
//!
//! ```text
//! submitter → AccessGate.ensure_submitter()
//!           → EpochLedger.close_if_due() → submission::verify()
//!           → distributor::compute_payouts() → EpochLedger.finalize_distributed()
//!           → snapshot_and_roll()            (current epoch only)
//! ```
//!
//! Every step is a precondition before the first mutation: a failing
//! submission moves no funds and leaves every epoch pool untouched.

pub mod distributor;
pub mod engine;
pub mod submission;

pub use distributor::{compute_payouts, payout_total};
pub use engine::ForecastEngine;
pub use submission::{LeaderboardSubmission, verify};

// The preview calculators of the read surface are the scoring plane's
// pure functions; re-export them so API consumers need one import.
pub use openforecast_scoring::{
    activity_bonus, correctness_multiplier, creator_points, early_bonus, market_size_weight,
    trader_points, volume_bonus,
};
