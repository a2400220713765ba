//! # openforecast-types
//!
//! Shared types, errors, and configuration for the **OpenForecast**
//! scoring-epoch and reward-distribution engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`], [`AddressKind`], [`MarketId`], [`EpochId`], [`Role`], [`PayoutId`]
//! - **Epoch model**: [`EpochStatus`], [`EpochConfig`], [`EpochRecord`]
//! - **Score model**: [`TraderEvent`], [`CreatorEvent`], [`TopPerformer`], [`Payout`]
//! - **Reward model**: [`RewardTable`]
//! - **Notifications**: [`EngineEvent`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`ForecastError`] with `OF_ERR_` prefix codes
//! - **Constants**: fixed-point unit, formula anchors, windows, caps

pub mod config;
pub mod constants;
pub mod epoch;
pub mod error;
pub mod events;
pub mod ids;
pub mod reward;
pub mod score;

// Re-export all primary types at crate root for ergonomic imports:
//   use openforecast_types::{Address, EpochId, RewardTable, ...};

pub use config::*;
pub use epoch::*;
pub use error::*;
pub use events::*;
pub use ids::*;
pub use reward::*;
pub use score::*;

// Constants are accessed via `openforecast_types::constants::FOO`
// (not re-exported to avoid name collisions).
