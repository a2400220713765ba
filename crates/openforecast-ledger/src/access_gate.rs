//! Access gate — hard authorization checks in front of every mutation.
//!
//! Two independent trust roles besides the owning operator:
//! a factory address that alone manages the authorized-caller set
//! (contracts only), and a submitter address that alone may submit
//! leaderboards. Every guard rejects before any state mutation.

use std::collections::HashSet;

use openforecast_types::{Address, AddressKind, ForecastError, Result};

/// Role membership for the engine's trust boundaries.
pub struct AccessGate {
    /// The owning operator.
    owner: Address,
    /// The factory contract managing the authorized-caller set.
    factory: Address,
    /// The trusted off-chain leaderboard submitter.
    submitter: Address,
    /// Contract addresses permitted to report scores and contribute funds.
    authorized: HashSet<Address>,
}

impl AccessGate {
    /// Create a gate with the three initial role holders.
    #[must_use]
    pub fn new(owner: Address, factory: Address, submitter: Address) -> Self {
        Self {
            owner,
            factory,
            submitter,
            authorized: HashSet::new(),
        }
    }

    // -- guards -----------------------------------------------------------

    /// Reject unless `caller` is the owning operator.
    pub fn ensure_owner(&self, caller: Address) -> Result<()> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(ForecastError::NotOwner(caller))
        }
    }

    /// Reject unless `caller` is the factory.
    pub fn ensure_factory(&self, caller: Address) -> Result<()> {
        if caller == self.factory {
            Ok(())
        } else {
            Err(ForecastError::NotFactory(caller))
        }
    }

    /// Reject unless `caller` is the leaderboard submitter.
    pub fn ensure_submitter(&self, caller: Address) -> Result<()> {
        if caller == self.submitter {
            Ok(())
        } else {
            Err(ForecastError::NotSubmitter(caller))
        }
    }

    /// Reject unless `caller` is in the authorized-caller set.
    pub fn ensure_authorized(&self, caller: Address) -> Result<()> {
        if self.authorized.contains(&caller) {
            Ok(())
        } else {
            Err(ForecastError::NotAuthorizedCaller(caller))
        }
    }

    // -- administration ---------------------------------------------------

    /// Owner-only: replace the factory address.
    pub fn set_factory(&mut self, caller: Address, factory: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        tracing::info!(factory = %factory, "factory changed");
        self.factory = factory;
        Ok(())
    }

    /// Owner-only: replace the leaderboard submitter.
    pub fn set_submitter(&mut self, caller: Address, submitter: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        tracing::info!(submitter = %submitter, "leaderboard submitter changed");
        self.submitter = submitter;
        Ok(())
    }

    /// Factory-only: flip membership of `target` in the authorized-caller
    /// set. Only code-bearing addresses may be authorized; `kind` is
    /// asserted by the factory from its deployment environment.
    pub fn set_authorized_caller(
        &mut self,
        caller: Address,
        target: Address,
        kind: AddressKind,
        enabled: bool,
    ) -> Result<()> {
        self.ensure_factory(caller)?;
        if enabled && kind != AddressKind::Contract {
            return Err(ForecastError::NotContractAddress(target));
        }
        if enabled {
            self.authorized.insert(target);
        } else {
            self.authorized.remove(&target);
        }
        tracing::info!(target = %target, enabled, "authorized-caller set updated");
        Ok(())
    }

    // -- reads ------------------------------------------------------------

    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    #[must_use]
    pub fn factory(&self) -> Address {
        self.factory
    }

    #[must_use]
    pub fn submitter(&self) -> Address {
        self.submitter
    }

    #[must_use]
    pub fn is_authorized(&self, address: Address) -> bool {
        self.authorized.contains(&address)
    }
}
