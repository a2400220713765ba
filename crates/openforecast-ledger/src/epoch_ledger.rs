//! The epoch ledger — per-epoch pools, score accumulation, and the
//! lazy epoch state machine.
//!
//! The ledger is the source of truth the submission protocol verifies
//! against. It owns:
//!
//! - one [`EpochRecord`] per epoch, each with its own isolated pool
//! - live per-participant scores for the current epoch, plus a
//!   deduplicated membership list per role
//! - lifetime totals per (address, role) that never reset
//! - a frozen history map, written once per epoch at snapshot time
//!
//! The `ACTIVE → PENDING_FINALIZE` transition is evaluated lazily: every
//! reporting, contribution, and submission call runs [`EpochLedger::close_if_due`]
//! first, so no external timer or scheduler is required.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use openforecast_types::{
    Address, EpochConfig, EpochId, EpochRecord, EpochStatus, ForecastError, Result, Role,
    TopPerformer,
};
use rust_decimal::Decimal;

/// Per-epoch record of accumulated points, pool balances, and status.
pub struct EpochLedger {
    /// Epoch timing.
    config: EpochConfig,
    /// The current (most recent) epoch.
    current: EpochId,
    /// Every epoch ever opened, keyed by id.
    epochs: HashMap<EpochId, EpochRecord>,
    /// Live accumulated scores for the current epoch.
    live: HashMap<(Address, Role), u128>,
    /// Lifetime totals per (address, role); never reset.
    lifetime: HashMap<(Address, Role), u128>,
    /// Frozen per-epoch scores, written at snapshot time. Immutable
    /// afterward — the ground truth for past-epoch verification.
    history: HashMap<(EpochId, Address, Role), u128>,
    /// Deduplicated membership list per role for the current epoch.
    members: HashMap<Role, Vec<Address>>,
    /// Stored top-K per (epoch, role), written exactly once.
    top: HashMap<(EpochId, Role), Vec<TopPerformer>>,
}

impl EpochLedger {
    /// Open the ledger with epoch 1 active as of `genesis`.
    #[must_use]
    pub fn new(genesis: DateTime<Utc>, config: EpochConfig) -> Self {
        let first = EpochId(1);
        let mut epochs = HashMap::new();
        epochs.insert(first, EpochRecord::open(first, genesis));
        Self {
            config,
            current: first,
            epochs,
            live: HashMap::new(),
            lifetime: HashMap::new(),
            history: HashMap::new(),
            members: HashMap::new(),
            top: HashMap::new(),
        }
    }

    // -- lookups ----------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &EpochConfig {
        &self.config
    }

    /// The current epoch id. Only ever advances, by exactly one.
    #[must_use]
    pub fn current_epoch(&self) -> EpochId {
        self.current
    }

    /// The record for `epoch`.
    ///
    /// # Errors
    /// Returns [`ForecastError::EpochNotFound`] for ids never opened.
    pub fn record(&self, epoch: EpochId) -> Result<&EpochRecord> {
        self.epochs
            .get(&epoch)
            .ok_or(ForecastError::EpochNotFound(epoch))
    }

    fn record_mut(&mut self, epoch: EpochId) -> Result<&mut EpochRecord> {
        self.epochs
            .get_mut(&epoch)
            .ok_or(ForecastError::EpochNotFound(epoch))
    }

    /// The status of `epoch`.
    pub fn status(&self, epoch: EpochId) -> Result<EpochStatus> {
        Ok(self.record(epoch)?.status)
    }

    /// The reporting deadline of `epoch`.
    pub fn deadline(&self, epoch: EpochId) -> Result<DateTime<Utc>> {
        Ok(self.record(epoch)?.deadline(&self.config))
    }

    /// The end of the submission grace window of `epoch`.
    pub fn grace_deadline(&self, epoch: EpochId) -> Result<DateTime<Utc>> {
        Ok(self.record(epoch)?.grace_deadline(&self.config))
    }

    // -- state machine ----------------------------------------------------

    /// Lazily close the current epoch if its deadline has passed.
    ///
    /// Returns the closed epoch id when the `ACTIVE → PENDING_FINALIZE`
    /// transition fired on this call. The transition persists even when
    /// the call that triggered it goes on to fail a precondition.
    pub fn close_if_due(&mut self, now: DateTime<Utc>) -> Option<EpochId> {
        let id = self.current;
        let deadline = self.config.deadline(self.epochs.get(&id)?.start_time);
        let record = self.epochs.get_mut(&id)?;
        if record.status == EpochStatus::Active && now >= deadline {
            record.status = EpochStatus::PendingFinalize;
            tracing::info!(epoch = %id, %deadline, "epoch closed, awaiting leaderboard");
            return Some(id);
        }
        None
    }

    /// Whether the current epoch is accepting reports and contributions.
    fn ensure_accepting(&self) -> Result<()> {
        let record = self.record(self.current)?;
        if record.status == EpochStatus::Active {
            Ok(())
        } else {
            Err(ForecastError::EpochNotAccepting(self.current))
        }
    }

    // -- accumulation -----------------------------------------------------

    /// Accumulate `points` for `(address, role)` in the current epoch.
    /// Tracks first-seen membership and the never-resetting lifetime
    /// total. Returns the new live total.
    ///
    /// # Errors
    /// Returns [`ForecastError::EpochNotAccepting`] while the current
    /// epoch awaits finalization.
    pub fn record_points(&mut self, address: Address, role: Role, points: u128) -> Result<u128> {
        self.ensure_accepting()?;

        let entry = self.live.entry((address, role)).or_insert(0);
        let first_report = *entry == 0 && points > 0;
        *entry = entry.saturating_add(points);
        let total = *entry;

        if first_report {
            let members = self.members.entry(role).or_default();
            if !members.contains(&address) {
                members.push(address);
            }
        }

        let lifetime = self.lifetime.entry((address, role)).or_insert(0);
        *lifetime = lifetime.saturating_add(points);

        Ok(total)
    }

    /// Credit `amount` to the current epoch's isolated pool.
    ///
    /// # Errors
    /// Rejects non-positive amounts and a non-accepting current epoch.
    pub fn contribute(&mut self, amount: Decimal) -> Result<EpochId> {
        if amount <= Decimal::ZERO {
            return Err(ForecastError::ZeroContribution);
        }
        self.ensure_accepting()?;
        let id = self.current;
        let record = self.record_mut(id)?;
        record.pool += amount;
        Ok(id)
    }

    // -- score reads ------------------------------------------------------

    /// Live accumulated score for the current epoch.
    #[must_use]
    pub fn live_score(&self, address: Address, role: Role) -> u128 {
        self.live.get(&(address, role)).copied().unwrap_or(0)
    }

    /// Lifetime total; never reset.
    #[must_use]
    pub fn lifetime_score(&self, address: Address, role: Role) -> u128 {
        self.lifetime.get(&(address, role)).copied().unwrap_or(0)
    }

    /// Frozen score for a stored (non-current) epoch.
    #[must_use]
    pub fn historical_score(&self, epoch: EpochId, address: Address, role: Role) -> u128 {
        self.history
            .get(&(epoch, address, role))
            .copied()
            .unwrap_or(0)
    }

    /// Verification ground truth: the live value for the current epoch,
    /// the frozen value for any past epoch.
    #[must_use]
    pub fn recorded_score(&self, epoch: EpochId, address: Address, role: Role) -> u128 {
        if epoch == self.current {
            self.live_score(address, role)
        } else {
            self.historical_score(epoch, address, role)
        }
    }

    /// Deduplicated participants of the current epoch for `role`.
    #[must_use]
    pub fn participants(&self, role: Role) -> &[Address] {
        self.members.get(&role).map_or(&[], Vec::as_slice)
    }

    // -- snapshot & roll --------------------------------------------------

    /// Freeze every tracked participant's live score into history, clear
    /// live state and membership, and open the next epoch.
    ///
    /// The new epoch starts at the predecessor's nominal deadline, so the
    /// weekly cadence stays aligned no matter how late finalization ran.
    /// Caller must have finalized the current epoch first; the new epoch
    /// id is returned.
    pub fn snapshot_and_roll(&mut self) -> Result<EpochId> {
        let closing = self.current;
        let record = self.record(closing)?;
        debug_assert!(
            record.status == EpochStatus::Finalized,
            "snapshot_and_roll on a non-finalized epoch"
        );
        let next_start = record.deadline(&self.config);

        for (role, members) in &self.members {
            for address in members {
                let points = self.live.get(&(*address, *role)).copied().unwrap_or(0);
                self.history.insert((closing, *address, *role), points);
            }
        }
        self.live.clear();
        self.members.clear();

        let next = closing.next();
        self.epochs.insert(next, EpochRecord::open(next, next_start));
        self.current = next;
        tracing::info!(closed = %closing, opened = %next, %next_start, "epoch rolled");
        Ok(next)
    }

    // -- finalization bookkeeping ----------------------------------------

    /// Finalize `epoch` after a verified distribution of `total` from its
    /// isolated pool.
    pub fn finalize_distributed(&mut self, epoch: EpochId, total: Decimal) -> Result<()> {
        let record = self.record_mut(epoch)?;
        if record.status != EpochStatus::PendingFinalize {
            return Err(ForecastError::WrongEpochStatus {
                epoch,
                expected: EpochStatus::PendingFinalize,
                actual: record.status,
            });
        }
        if record.is_distributed {
            return Err(ForecastError::AlreadyDistributed(epoch));
        }
        if total > record.pool {
            return Err(ForecastError::InsufficientPool {
                requested: total,
                available: record.pool,
            });
        }
        record.pool -= total;
        record.distributed += total;
        record.is_distributed = true;
        record.status = EpochStatus::Finalized;
        Ok(())
    }

    /// Finalize `epoch` through the recovery path: no funds move, the
    /// isolated pool is preserved for manual distribution.
    pub fn finalize_recovered(&mut self, epoch: EpochId) -> Result<()> {
        let record = self.record_mut(epoch)?;
        if record.status != EpochStatus::PendingFinalize {
            return Err(ForecastError::WrongEpochStatus {
                epoch,
                expected: EpochStatus::PendingFinalize,
                actual: record.status,
            });
        }
        record.status = EpochStatus::Finalized;
        record.recovered = true;
        Ok(())
    }

    /// Spend `total` from a recovery-finalized epoch's preserved pool.
    pub fn apply_manual_distribution(&mut self, epoch: EpochId, total: Decimal) -> Result<()> {
        let record = self.record_mut(epoch)?;
        if record.status != EpochStatus::Finalized || !record.recovered {
            return Err(ForecastError::NotRecoveryFinalized(epoch));
        }
        if record.is_distributed {
            return Err(ForecastError::AlreadyDistributed(epoch));
        }
        if total > record.pool {
            return Err(ForecastError::InsufficientPool {
                requested: total,
                available: record.pool,
            });
        }
        record.pool -= total;
        record.distributed += total;
        record.is_distributed = true;
        Ok(())
    }

    /// Break-glass: drain every epoch's remaining pool. Returns the total
    /// swept.
    pub fn sweep_pools(&mut self) -> Decimal {
        let mut total = Decimal::ZERO;
        for record in self.epochs.values_mut() {
            total += record.pool;
            record.pool = Decimal::ZERO;
        }
        total
    }

    // -- stored rankings --------------------------------------------------

    /// Store the verified top-K for `(epoch, role)`. Written exactly once
    /// at finalization.
    pub fn store_top_performers(
        &mut self,
        epoch: EpochId,
        role: Role,
        entries: Vec<TopPerformer>,
    ) {
        debug_assert!(
            !self.top.contains_key(&(epoch, role)),
            "top performers are write-once"
        );
        self.top.insert((epoch, role), entries);
    }

    /// The stored top-K for `(epoch, role)`, if the epoch finalized with
    /// a verified submission.
    #[must_use]
    pub fn top_performers(&self, epoch: EpochId, role: Role) -> Option<&[TopPerformer]> {
        self.top.get(&(epoch, role)).map(Vec::as_slice)
    }

    /// Epochs awaiting finalization, oldest first, with pool sizes.
    #[must_use]
    pub fn pending_epochs(&self) -> Vec<(EpochId, Decimal)> {
        let mut pending: Vec<(EpochId, Decimal)> = self
            .epochs
            .values()
            .filter(|r| r.status == EpochStatus::PendingFinalize)
            .map(|r| (r.id, r.pool))
            .collect();
        pending.sort_by_key(|(id, _)| *id);
        pending
    }
}
