//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::{Address, EpochConfig, RewardTable};

/// Construction-time wiring for a [`ForecastEngine`] instance: the three
/// trust roles, the epoch timing, and the initial reward table.
///
/// [`ForecastEngine`]: https://docs.rs/openforecast-engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The owning operator: controls role assignment, the reward table,
    /// and all emergency operations.
    pub owner: Address,
    /// The factory contract that alone manages the authorized-caller set.
    pub factory: Address,
    /// The trusted off-chain identity permitted to submit leaderboards.
    pub submitter: Address,
    /// Epoch timing.
    pub epoch: EpochConfig,
    /// Initial reward percentage table.
    pub reward_table: RewardTable,
}

impl EngineConfig {
    /// A config with the given roles and default timing/table.
    #[must_use]
    pub fn with_roles(owner: Address, factory: Address, submitter: Address) -> Self {
        Self {
            owner,
            factory,
            submitter,
            epoch: EpochConfig::default(),
            reward_table: RewardTable::default(),
        }
    }
}
