//! # openforecast-scoring
//!
//! **Pure deterministic Forecast Point formulas for OpenForecast.**
//!
//! The scoring engine is the compute plane -- it converts trade and
//! creation facts into fixed-point point values. It has:
//!
//! - **Zero side effects**: no stored state, no ledger access
//! - **Total functions**: zero divisors pre-empted by explicit checks
//!   returning the documented floor/ceiling value
//! - **Deterministic output**: same facts -> same points everywhere,
//!   which is what lets the engine re-verify externally computed rankings
//!
//! The same functions back the read surface's preview calculators.

pub mod creator;
pub mod trader;
pub mod weights;

pub use creator::{activity_bonus, creator_points, volume_bonus};
pub use trader::trader_points;
pub use weights::{correctness_multiplier, early_bonus, market_size_weight};
