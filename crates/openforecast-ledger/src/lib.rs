//! # openforecast-ledger
//!
//! **State Plane**: authorization gate, per-epoch fund isolation, score
//! accumulation, and the lazy epoch state machine.
//!
//! ## Architecture
//!
//! The state plane sits between the reporting surface and the finality
//! plane:
//! 1. **AccessGate**: owner / factory / submitter roles plus the
//!    authorized-caller set (contracts only) — fail-closed checks before
//!    any mutation
//! 2. **EpochLedger**: epoch records with isolated pools, live and
//!    lifetime score maps, frozen per-epoch history, and the
//!    `ACTIVE → PENDING_FINALIZE → FINALIZED` lifecycle
//!
//! ## Report Flow
//!
//! ```text
//! market contract → AccessGate.ensure_authorized()
//!                 → EpochLedger.close_if_due() → EpochLedger.record_points()
//! ```
//!
//! Deadlines are logical comparisons against a caller-supplied `now`,
//! re-evaluated on every relevant call; there is no scheduler.

pub mod access_gate;
pub mod epoch_ledger;

pub use access_gate::AccessGate;
pub use epoch_ledger::EpochLedger;
