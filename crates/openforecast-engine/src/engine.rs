//! The `ForecastEngine` orchestrator.
//!
//! One engine instance owns the access gate, the epoch ledger, the reward
//! table, and the payout bookkeeping — there is no global state. Every
//! entry point runs to completion or leaves state untouched; the `&mut
//! self` receivers make the distribution path non-reentrant by
//! construction.
//!
//! Deadlines are evaluated lazily: each reporting, contribution,
//! submission, and recovery call first gives the ledger a chance to close
//! an overdue epoch before its own preconditions run.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use openforecast_ledger::{AccessGate, EpochLedger};
use openforecast_scoring::{creator_points, trader_points};
use openforecast_types::{
    Address, AddressKind, CreatorEvent, EngineConfig, EngineEvent, EpochId, EpochRecord,
    EpochStatus, ForecastError, Payout, PayoutId, Result, RewardTable, Role, TraderEvent,
    constants,
};
use rust_decimal::Decimal;

use crate::distributor::{compute_payouts, payout_total};
use crate::submission::{self, LeaderboardSubmission};

/// The weekly scoring-epoch and reward-distribution engine.
pub struct ForecastEngine {
    /// Trust roles and the authorized-caller set.
    gate: AccessGate,
    /// Epoch records, pools, and score maps.
    ledger: EpochLedger,
    /// Basis-point weights for the ten ranked trader slots.
    reward_table: RewardTable,
    /// Rewards credited per address, across all epochs.
    reward_balances: HashMap<Address, Decimal>,
    /// Payout records per epoch (verified or manual).
    distributions: HashMap<EpochId, Vec<Payout>>,
    /// Append-only notification log.
    events: Vec<EngineEvent>,
}

impl ForecastEngine {
    /// Build an engine with epoch 1 active as of `genesis`.
    #[must_use]
    pub fn new(config: EngineConfig, genesis: DateTime<Utc>) -> Self {
        Self {
            gate: AccessGate::new(config.owner, config.factory, config.submitter),
            ledger: EpochLedger::new(genesis, config.epoch),
            reward_table: config.reward_table,
            reward_balances: HashMap::new(),
            distributions: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Run the lazy close and record the notification if it fired.
    fn lazy_close(&mut self, now: DateTime<Utc>) {
        if let Some(epoch) = self.ledger.close_if_due(now) {
            self.events.push(EngineEvent::EpochClosed { epoch });
        }
    }

    // =====================================================================
    // Reporting surface (authorized market contracts)
    // =====================================================================

    /// Credit `amount` to the current epoch's isolated pool.
    pub fn contribute_to_pool(
        &mut self,
        caller: Address,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<EpochId> {
        self.gate.ensure_authorized(caller)?;
        self.lazy_close(now);
        let epoch = self.ledger.contribute(amount)?;
        self.events.push(EngineEvent::PoolContribution {
            epoch,
            from: caller,
            amount,
        });
        tracing::debug!(%epoch, from = %caller, %amount, "pool contribution");
        Ok(epoch)
    }

    /// Convert a reported trading fact into Forecast Points and
    /// accumulate them for the trader. Returns the points awarded.
    pub fn report_trader_event(
        &mut self,
        caller: Address,
        event: &TraderEvent,
        now: DateTime<Utc>,
    ) -> Result<u128> {
        self.gate.ensure_authorized(caller)?;
        self.lazy_close(now);
        let points = trader_points(event);
        self.ledger.record_points(event.user, Role::Trader, points)?;
        Ok(points)
    }

    /// Convert a reported creation fact into Forecast Points and
    /// accumulate them for the creator. Returns the points awarded.
    pub fn report_creator_event(
        &mut self,
        caller: Address,
        event: &CreatorEvent,
        now: DateTime<Utc>,
    ) -> Result<u128> {
        self.gate.ensure_authorized(caller)?;
        self.lazy_close(now);
        let points = creator_points(event);
        self.ledger
            .record_points(event.creator, Role::Creator, points)?;
        Ok(points)
    }

    // =====================================================================
    // Submission surface (leaderboard submitter)
    // =====================================================================

    /// Verify an externally computed leaderboard for `epoch` and, on
    /// success, distribute the epoch's isolated pool and finalize it.
    /// Returns the total amount distributed.
    pub fn submit_leaderboard(
        &mut self,
        caller: Address,
        epoch: EpochId,
        submission: &LeaderboardSubmission,
        now: DateTime<Utc>,
    ) -> Result<Decimal> {
        self.gate.ensure_submitter(caller)?;
        self.finalize_with_submission(epoch, submission, now)
    }

    /// Apply a chronologically consecutive run of submissions in order —
    /// the catch-up path after an outage. Each epoch goes through the
    /// exact same verification and distribution as a single submission;
    /// the batch stops at the first failing epoch, leaving the epochs
    /// already finalized by this call in place.
    pub fn submit_leaderboard_batch(
        &mut self,
        caller: Address,
        batch: &[(EpochId, LeaderboardSubmission)],
        now: DateTime<Utc>,
    ) -> Result<Decimal> {
        self.gate.ensure_submitter(caller)?;
        if batch.is_empty() {
            return Err(ForecastError::EmptyBatch);
        }
        if batch.len() > constants::MAX_BATCH_EPOCHS {
            return Err(ForecastError::BatchTooLarge {
                count: batch.len(),
                max: constants::MAX_BATCH_EPOCHS,
            });
        }
        for window in batch.windows(2) {
            let (previous, next) = (window[0].0, window[1].0);
            if next != previous.next() {
                return Err(ForecastError::NonConsecutiveEpochs { previous, next });
            }
        }

        let mut total = Decimal::ZERO;
        for (epoch, submission) in batch {
            total += self.finalize_with_submission(*epoch, submission, now)?;
        }
        Ok(total)
    }

    /// Shared by the single and batch submission paths.
    fn finalize_with_submission(
        &mut self,
        epoch: EpochId,
        submission: &LeaderboardSubmission,
        now: DateTime<Utc>,
    ) -> Result<Decimal> {
        self.lazy_close(now);

        let record = self.ledger.record(epoch)?;
        match record.status {
            EpochStatus::Active => return Err(ForecastError::EpochNotOver(epoch)),
            EpochStatus::Finalized => {
                return Err(ForecastError::WrongEpochStatus {
                    epoch,
                    expected: EpochStatus::PendingFinalize,
                    actual: EpochStatus::Finalized,
                });
            }
            EpochStatus::PendingFinalize => {}
        }
        if now > record.grace_deadline(self.ledger.config()) {
            return Err(ForecastError::SubmissionWindowClosed(epoch));
        }
        let pool = record.pool;

        submission::verify(submission, &self.ledger, epoch)?;

        let payouts = compute_payouts(pool, &self.reward_table, &submission.ranked_traders, epoch);
        let total = payout_total(&payouts);
        let is_current = epoch == self.ledger.current_epoch();

        self.ledger.finalize_distributed(epoch, total)?;
        self.ledger
            .store_top_performers(epoch, Role::Trader, submission.trader_performers());
        self.ledger
            .store_top_performers(epoch, Role::Creator, submission.creator_performers());
        for payout in &payouts {
            *self.reward_balances.entry(payout.address).or_default() += payout.amount;
        }

        tracing::info!(
            %epoch,
            %total,
            traders = submission.ranked_traders.len(),
            creators = submission.ranked_creators.len(),
            backdated = !is_current,
            "leaderboard verified, rewards distributed"
        );
        self.events.push(EngineEvent::LeaderboardSubmitted {
            epoch,
            trader_entries: submission.ranked_traders.len(),
            creator_entries: submission.ranked_creators.len(),
        });
        self.events.push(EngineEvent::RewardsDistributed {
            epoch,
            total,
            backdated: !is_current,
        });
        self.distributions.insert(epoch, payouts);

        if is_current {
            self.roll_current()?;
        }
        Ok(total)
    }

    /// Snapshot the finalized current epoch into history and open the
    /// next one.
    fn roll_current(&mut self) -> Result<()> {
        let next = self.ledger.snapshot_and_roll()?;
        let start_time = self.ledger.record(next)?.start_time;
        self.events.push(EngineEvent::EpochOpened {
            epoch: next,
            start_time,
        });
        Ok(())
    }

    // =====================================================================
    // Recovery surface (owner)
    // =====================================================================

    /// Finalize an epoch whose grace window elapsed with no submission.
    /// Moves no funds: the isolated pool is preserved for manual
    /// distribution. If the epoch is the current one, the ledger still
    /// snapshots and rolls so scoring is never stuck.
    pub fn emergency_finalize(
        &mut self,
        caller: Address,
        epoch: EpochId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.gate.ensure_owner(caller)?;
        self.lazy_close(now);

        let record = self.ledger.record(epoch)?;
        if record.status != EpochStatus::PendingFinalize {
            return Err(ForecastError::WrongEpochStatus {
                epoch,
                expected: EpochStatus::PendingFinalize,
                actual: record.status,
            });
        }
        if now <= record.grace_deadline(self.ledger.config()) {
            return Err(ForecastError::GraceWindowNotElapsed(epoch));
        }
        let pool = record.pool;
        let is_current = epoch == self.ledger.current_epoch();

        self.ledger.finalize_recovered(epoch)?;
        tracing::warn!(%epoch, %pool, "epoch finalized through recovery, pool preserved");
        self.events.push(EngineEvent::EmergencyFinalized { epoch, pool });

        if is_current {
            self.roll_current()?;
        }
        Ok(())
    }

    /// Manually pay `winners` out of a recovery-finalized epoch's
    /// preserved pool. The amounts must not exceed the remaining pool.
    pub fn manual_distribution(
        &mut self,
        caller: Address,
        epoch: EpochId,
        winners: &[Address],
        amounts: &[Decimal],
    ) -> Result<Decimal> {
        self.gate.ensure_owner(caller)?;
        if winners.len() != amounts.len() {
            return Err(ForecastError::LengthMismatch {
                addresses: winners.len(),
                points: amounts.len(),
            });
        }

        let total: Decimal = amounts.iter().copied().sum();
        self.ledger.apply_manual_distribution(epoch, total)?;

        let payouts: Vec<Payout> = winners
            .iter()
            .zip(amounts)
            .enumerate()
            .map(|(index, (address, amount))| Payout {
                id: PayoutId::deterministic(epoch, Role::Trader, index as u32 + 1),
                address: *address,
                rank: index as u32 + 1,
                amount: *amount,
            })
            .collect();
        for payout in &payouts {
            *self.reward_balances.entry(payout.address).or_default() += payout.amount;
        }
        self.distributions.insert(epoch, payouts);

        tracing::warn!(%epoch, %total, "manual reward distribution");
        self.events
            .push(EngineEvent::ManualDistribution { epoch, total });
        Ok(total)
    }

    /// Break-glass: sweep every epoch's remaining pool to the owner.
    pub fn emergency_withdraw(&mut self, caller: Address) -> Result<Decimal> {
        self.gate.ensure_owner(caller)?;
        let total = self.ledger.sweep_pools();
        *self.reward_balances.entry(self.gate.owner()).or_default() += total;
        tracing::warn!(%total, "emergency withdrawal of all pools");
        self.events.push(EngineEvent::EmergencyWithdrawal { total });
        Ok(total)
    }

    // =====================================================================
    // Administrative surface
    // =====================================================================

    /// Owner-only: replace the leaderboard submitter.
    pub fn set_submitter(&mut self, caller: Address, submitter: Address) -> Result<()> {
        self.gate.set_submitter(caller, submitter)?;
        self.events.push(EngineEvent::SubmitterChanged { submitter });
        Ok(())
    }

    /// Owner-only: replace the authorizing factory.
    pub fn set_factory(&mut self, caller: Address, factory: Address) -> Result<()> {
        self.gate.set_factory(caller, factory)?;
        self.events.push(EngineEvent::FactoryChanged { factory });
        Ok(())
    }

    /// Factory-only: flip membership in the authorized-caller set.
    pub fn set_authorized_caller(
        &mut self,
        caller: Address,
        target: Address,
        kind: AddressKind,
        enabled: bool,
    ) -> Result<()> {
        self.gate
            .set_authorized_caller(caller, target, kind, enabled)?;
        self.events.push(EngineEvent::CallerAuthorized {
            caller: target,
            enabled,
        });
        Ok(())
    }

    /// Owner-only: replace the reward table. The weights must sum to
    /// exactly 10,000 bps.
    pub fn set_reward_table(
        &mut self,
        caller: Address,
        weights: [u16; constants::REWARD_SLOTS],
    ) -> Result<()> {
        self.gate.ensure_owner(caller)?;
        self.reward_table = RewardTable::new(weights)?;
        self.events.push(EngineEvent::RewardTableUpdated);
        Ok(())
    }

    // =====================================================================
    // Read surface
    // =====================================================================

    /// The current epoch id.
    #[must_use]
    pub fn current_epoch(&self) -> EpochId {
        self.ledger.current_epoch()
    }

    /// Status, timing, and pool of `epoch`.
    pub fn epoch_record(&self, epoch: EpochId) -> Result<&EpochRecord> {
        self.ledger.record(epoch)
    }

    /// Live accumulated score for the current epoch.
    #[must_use]
    pub fn live_score(&self, address: Address, role: Role) -> u128 {
        self.ledger.live_score(address, role)
    }

    /// Lifetime score; never reset.
    #[must_use]
    pub fn lifetime_score(&self, address: Address, role: Role) -> u128 {
        self.ledger.lifetime_score(address, role)
    }

    /// Frozen score for a stored epoch.
    #[must_use]
    pub fn historical_score(&self, epoch: EpochId, address: Address, role: Role) -> u128 {
        self.ledger.historical_score(epoch, address, role)
    }

    /// The stored top-K for `(epoch, role)`, if finalized by submission.
    #[must_use]
    pub fn top_performers(&self, epoch: EpochId, role: Role) -> Option<&[openforecast_types::TopPerformer]> {
        self.ledger.top_performers(epoch, role)
    }

    /// Payout records of `epoch` (verified or manual); empty if none.
    #[must_use]
    pub fn payouts(&self, epoch: EpochId) -> &[Payout] {
        self.distributions.get(&epoch).map_or(&[], Vec::as_slice)
    }

    /// Epochs awaiting finalization, oldest first, with pool sizes.
    #[must_use]
    pub fn pending_epochs(&self) -> Vec<(EpochId, Decimal)> {
        self.ledger.pending_epochs()
    }

    /// Total rewards credited to `address` across all epochs.
    #[must_use]
    pub fn reward_balance(&self, address: Address) -> Decimal {
        self.reward_balances
            .get(&address)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// The active reward table.
    #[must_use]
    pub fn reward_table(&self) -> &RewardTable {
        &self.reward_table
    }

    /// The access gate (role membership reads).
    #[must_use]
    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    /// The epoch ledger (score and timing reads).
    #[must_use]
    pub fn ledger(&self) -> &EpochLedger {
        &self.ledger
    }

    /// Notifications emitted so far.
    #[must_use]
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Drain the notification log for external delivery.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // =====================================================================
    // Preview calculators (no state mutation)
    // =====================================================================

    /// Points a trading fact would earn, without recording anything.
    #[must_use]
    pub fn preview_trader_points(event: &TraderEvent) -> u128 {
        trader_points(event)
    }

    /// Points a creation fact would earn, without recording anything.
    #[must_use]
    pub fn preview_creator_points(event: &CreatorEvent) -> u128 {
        creator_points(event)
    }
}
