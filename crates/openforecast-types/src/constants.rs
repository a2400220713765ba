//! System-wide constants for the OpenForecast engine.

/// Fixed-point unit: 1,000,000 represents 1.0.
pub const FP_UNIT: u128 = 1_000_000;

/// Market-size weight floor (0.5×) applied to zero-volume markets.
pub const MIN_MARKET_WEIGHT: u128 = 500_000;

/// Market-size weight ceiling (2.0×).
pub const MAX_MARKET_WEIGHT: u128 = 2_000_000;

/// Volume (in whole units) at which the market-size weight reaches its
/// 2.0× ceiling. The ramp is linear from 0.5× at zero volume.
pub const MARKET_WEIGHT_CEILING_VOLUME: u128 = 1_500;

/// Early-position bonus ceiling (2.0×) for positions opened at or before
/// market creation.
pub const MAX_EARLY_BONUS: u128 = 2_000_000;

/// Correctness multiplier ceiling (2.0×) for positions taken entirely
/// against the consensus.
pub const MAX_CORRECTNESS_MULTIPLIER: u128 = 2_000_000;

/// Flat creator award per market, in Forecast Points (fixed point).
pub const CREATOR_BASE_FP: u128 = 10 * FP_UNIT;

/// Creator volume bonus: FP per whole unit of traded volume (0.01 FP).
pub const CREATOR_VOLUME_BONUS_PER_UNIT: u128 = FP_UNIT / 100;

/// Creator activity bonus: FP per trade executed in the market (0.1 FP).
pub const CREATOR_ACTIVITY_BONUS_PER_TRADE: u128 = FP_UNIT / 10;

/// Default scoring epoch duration in seconds (7 days).
pub const DEFAULT_EPOCH_DURATION_SECS: u64 = 7 * 24 * 60 * 60;

/// Default grace window after the epoch deadline during which a
/// leaderboard submission is still accepted (2 days).
pub const DEFAULT_GRACE_WINDOW_SECS: u64 = 2 * 24 * 60 * 60;

/// Maximum leaderboard entries accepted per role in one submission.
pub const MAX_LEADERBOARD_ENTRIES: usize = 50;

/// Number of ranked trader slots that receive a share of the pool.
pub const REWARD_SLOTS: usize = 10;

/// Basis-point denominator: 10,000 bps = 100%.
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Maximum epochs accepted in one batch submission (catch-up cap).
pub const MAX_BATCH_EPOCHS: usize = 12;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenForecast";
