//! End-to-end integration tests across all three planes.
//!
//! These tests exercise the full epoch lifecycle:
//! reporting surface -> `EpochLedger` -> submission protocol -> distributor
//!
//! They verify that the planes work together correctly in realistic
//! scenarios: funded epochs, verified distributions, adversarial
//! submissions, recovery after an absent submitter, and batch catch-up.

use std::time::Duration;

use chrono::{DateTime, Utc};
use openforecast_engine::{ForecastEngine, LeaderboardSubmission};
use openforecast_types::*;
use rust_decimal::Decimal;

const OWNER: Address = Address([1u8; 20]);
const FACTORY: Address = Address([2u8; 20]);
const SUBMITTER: Address = Address([3u8; 20]);
const MARKET: Address = Address([4u8; 20]);

fn days(n: u64) -> Duration {
    Duration::from_secs(n * 24 * 3600)
}

fn trader(n: u64) -> Address {
    Address::from_low_u64(100 + n)
}

/// Helper: engine with one authorized market contract and a pinned
/// genesis instant, so every deadline is a known offset.
struct Harness {
    engine: ForecastEngine,
    genesis: DateTime<Utc>,
}

impl Harness {
    fn new() -> Self {
        Self::with_windows(days(7), days(2))
    }

    fn with_windows(duration: Duration, grace_window: Duration) -> Self {
        let genesis = Utc::now();
        let mut config = EngineConfig::with_roles(OWNER, FACTORY, SUBMITTER);
        config.epoch = EpochConfig {
            duration,
            grace_window,
        };
        let mut engine = ForecastEngine::new(config, genesis);
        engine
            .set_authorized_caller(FACTORY, MARKET, AddressKind::Contract, true)
            .expect("factory authorizes the market contract");
        Self { engine, genesis }
    }

    fn at(&self, offset: Duration) -> DateTime<Utc> {
        self.genesis + offset
    }

    /// Report a position opened at creation time on the correct side of
    /// a 100-unit market: weight 0.6×, bonus 2.0×, multiplier 1.0× —
    /// `size × 1.2` Forecast Points.
    fn report(&mut self, user: Address, size: u128, now: DateTime<Utc>) -> u128 {
        let event = TraderEvent {
            user,
            market: MarketId::new(),
            volume: 100,
            position_time: self.genesis,
            creation_time: self.genesis,
            duration: days(7),
            correct_side_liquidity: 100,
            total_liquidity: 100,
            position_size: size,
        };
        self.engine
            .report_trader_event(MARKET, &event, now)
            .expect("report should be accepted")
    }

    fn fund(&mut self, amount: i64, now: DateTime<Utc>) {
        self.engine
            .contribute_to_pool(MARKET, Decimal::new(amount, 0), now)
            .expect("contribution should be accepted");
    }

    /// Submission listing the given traders with their live scores,
    /// already ordered best-first by the caller.
    fn ranking_of(&self, traders: &[Address]) -> LeaderboardSubmission {
        LeaderboardSubmission {
            ranked_traders: traders.to_vec(),
            trader_points: traders
                .iter()
                .map(|t| self.engine.live_score(*t, Role::Trader))
                .collect(),
            ranked_creators: Vec::new(),
            creator_points: Vec::new(),
        }
    }
}

// =============================================================================
// Test: full lifecycle — fund, report, close, submit, distribute, roll
// =============================================================================
#[test]
fn e2e_full_epoch_lifecycle() {
    let mut h = Harness::new();
    let (alice, bob) = (trader(1), trader(2));

    h.fund(10_000, h.at(days(1)));
    let alice_points = h.report(alice, 50, h.at(days(1)));
    let bob_points = h.report(bob, 20, h.at(days(2)));
    assert!(alice_points > bob_points);

    // Deadline passes; the submitter posts the verified ranking.
    let submission = h.ranking_of(&[alice, bob]);
    let paid = h
        .engine
        .submit_leaderboard(SUBMITTER, EpochId(1), &submission, h.at(days(8)))
        .expect("verified submission should distribute");

    // Default table: rank 1 gets 25%, rank 2 gets 18%.
    assert_eq!(paid, Decimal::new(4_300, 0));
    assert_eq!(h.engine.reward_balance(alice), Decimal::new(2_500, 0));
    assert_eq!(h.engine.reward_balance(bob), Decimal::new(1_800, 0));

    // Epoch 1 is finalized and distributed; the dust stays in its pool.
    let record = h.engine.epoch_record(EpochId(1)).unwrap();
    assert_eq!(record.status, EpochStatus::Finalized);
    assert!(record.is_distributed);
    assert_eq!(record.pool, Decimal::new(5_700, 0));
    assert_eq!(record.distributed, Decimal::new(4_300, 0));

    // The engine rolled: epoch 2 is current, live state cleared, history
    // frozen, lifetime preserved.
    assert_eq!(h.engine.current_epoch(), EpochId(2));
    assert_eq!(h.engine.live_score(alice, Role::Trader), 0);
    assert_eq!(
        h.engine.historical_score(EpochId(1), alice, Role::Trader),
        alice_points
    );
    assert_eq!(h.engine.lifetime_score(alice, Role::Trader), alice_points);

    // Stored top-K is readable with the payout records.
    let top = h.engine.top_performers(EpochId(1), Role::Trader).unwrap();
    assert_eq!(top[0].address, alice);
    assert_eq!(top[0].points, alice_points);
    assert_eq!(h.engine.payouts(EpochId(1)).len(), 2);
}

// =============================================================================
// Test: default reward table over a 10,000-unit pool, full top ten
// =============================================================================
#[test]
fn e2e_reward_table_scenario() {
    let mut h = Harness::new();
    let ranked: Vec<Address> = (1..=10).map(trader).collect();

    h.fund(10_000, h.at(days(0)));
    // Strictly decreasing sizes give a strictly decreasing ranking.
    for (i, t) in ranked.iter().enumerate() {
        h.report(*t, (100 - 5 * i) as u128, h.at(days(1)));
    }

    let submission = h.ranking_of(&ranked);
    let paid = h
        .engine
        .submit_leaderboard(SUBMITTER, EpochId(1), &submission, h.at(days(8)))
        .unwrap();

    // Rank 1 receives exactly 2,500 of the 10,000 pool; the ten shares
    // sum to no more than the pool.
    assert_eq!(h.engine.reward_balance(ranked[0]), Decimal::new(2_500, 0));
    assert!(paid <= Decimal::new(10_000, 0));
    assert_eq!(paid, Decimal::new(10_000, 0));

    let payouts = h.engine.payouts(EpochId(1));
    assert_eq!(payouts.len(), 10);
    assert_eq!(payouts[9].amount, Decimal::new(200, 0));
}

// =============================================================================
// Test: verification soundness — one unit off, nothing moves
// =============================================================================
#[test]
fn e2e_one_unit_mismatch_moves_no_funds() {
    let mut h = Harness::new();
    let alice = trader(1);

    h.fund(10_000, h.at(days(1)));
    h.report(alice, 50, h.at(days(1)));

    let mut submission = h.ranking_of(&[alice]);
    submission.trader_points[0] += 1;

    let err = h
        .engine
        .submit_leaderboard(SUBMITTER, EpochId(1), &submission, h.at(days(8)))
        .unwrap_err();
    assert!(matches!(err, ForecastError::ScoreMismatch { .. }));

    // No funds moved, the epoch is still awaiting finalization, and a
    // corrected resubmission succeeds.
    assert_eq!(h.engine.reward_balance(alice), Decimal::ZERO);
    let record = h.engine.epoch_record(EpochId(1)).unwrap();
    assert_eq!(record.status, EpochStatus::PendingFinalize);
    assert_eq!(record.pool, Decimal::new(10_000, 0));
    assert_eq!(h.engine.pending_epochs(), vec![(EpochId(1), Decimal::new(10_000, 0))]);

    let corrected = h.ranking_of(&[alice]);
    h.engine
        .submit_leaderboard(SUBMITTER, EpochId(1), &corrected, h.at(days(8)))
        .unwrap();
    assert_eq!(h.engine.reward_balance(alice), Decimal::new(2_500, 0));
}

// =============================================================================
// Test: no double distribution
// =============================================================================
#[test]
fn e2e_double_distribution_blocked() {
    let mut h = Harness::new();
    let alice = trader(1);
    h.fund(1_000, h.at(days(1)));
    h.report(alice, 50, h.at(days(1)));

    let submission = h.ranking_of(&[alice]);
    h.engine
        .submit_leaderboard(SUBMITTER, EpochId(1), &submission, h.at(days(8)))
        .unwrap();

    // A second submission for the finalized epoch fails.
    let err = h
        .engine
        .submit_leaderboard(SUBMITTER, EpochId(1), &LeaderboardSubmission::default(), h.at(days(8)))
        .unwrap_err();
    assert!(matches!(err, ForecastError::WrongEpochStatus { .. }));

    // So does a manual distribution: the epoch did not go through
    // recovery.
    let err = h
        .engine
        .manual_distribution(OWNER, EpochId(1), &[alice], &[Decimal::ONE])
        .unwrap_err();
    assert!(matches!(err, ForecastError::NotRecoveryFinalized(_)));
}

// =============================================================================
// Test: pool isolation across epochs
// =============================================================================
#[test]
fn e2e_pool_isolation() {
    let mut h = Harness::new();
    let alice = trader(1);
    h.fund(5_000, h.at(days(1)));
    h.report(alice, 10, h.at(days(1)));

    let submission = h.ranking_of(&[alice]);
    h.engine
        .submit_leaderboard(SUBMITTER, EpochId(1), &submission, h.at(days(8)))
        .unwrap();

    // Epoch 2 contributions land only in epoch 2's pool.
    h.fund(777, h.at(days(9)));
    let epoch1_pool = h.engine.epoch_record(EpochId(1)).unwrap().pool;
    assert_eq!(
        h.engine.epoch_record(EpochId(2)).unwrap().pool,
        Decimal::new(777, 0)
    );
    // Epoch 1's remainder is untouched by epoch 2 activity.
    assert_eq!(h.engine.epoch_record(EpochId(1)).unwrap().pool, epoch1_pool);
}

// =============================================================================
// Test: the recovery path end to end
// =============================================================================
#[test]
fn e2e_recovery_after_absent_submitter() {
    let mut h = Harness::new();
    let alice = trader(1);
    h.fund(4_000, h.at(days(1)));
    h.report(alice, 50, h.at(days(1)));

    // Recovery before the grace window has elapsed is rejected.
    let err = h
        .engine
        .emergency_finalize(OWNER, EpochId(1), h.at(days(8)))
        .unwrap_err();
    assert!(matches!(err, ForecastError::GraceWindowNotElapsed(_)));

    // Submissions inside the grace window would still win; past it, they
    // are rejected and only recovery remains.
    let late = h.ranking_of(&[alice]);
    let err = h
        .engine
        .submit_leaderboard(SUBMITTER, EpochId(1), &late, h.at(days(10)))
        .unwrap_err();
    assert!(matches!(err, ForecastError::SubmissionWindowClosed(_)));

    // Owner-only.
    let err = h
        .engine
        .emergency_finalize(SUBMITTER, EpochId(1), h.at(days(10)))
        .unwrap_err();
    assert!(matches!(err, ForecastError::NotOwner(_)));

    h.engine
        .emergency_finalize(OWNER, EpochId(1), h.at(days(10)))
        .unwrap();

    // Finalized without moving funds; the scores were still snapshotted
    // and the next epoch opened, so reporting resumes.
    let record = h.engine.epoch_record(EpochId(1)).unwrap();
    assert_eq!(record.status, EpochStatus::Finalized);
    assert!(record.recovered);
    assert!(!record.is_distributed);
    assert_eq!(record.pool, Decimal::new(4_000, 0));
    assert_eq!(h.engine.current_epoch(), EpochId(2));
    assert_eq!(
        h.engine.historical_score(EpochId(1), alice, Role::Trader),
        h.engine.lifetime_score(alice, Role::Trader)
    );
    h.report(alice, 10, h.at(days(10)));

    // Manual distribution beyond the preserved pool reverts...
    let err = h
        .engine
        .manual_distribution(OWNER, EpochId(1), &[alice], &[Decimal::new(4_001, 0)])
        .unwrap_err();
    assert!(matches!(err, ForecastError::InsufficientPool { .. }));
    assert_eq!(
        h.engine.epoch_record(EpochId(1)).unwrap().pool,
        Decimal::new(4_000, 0)
    );

    // ...and a bounded one pays out and marks the epoch distributed.
    h.engine
        .manual_distribution(OWNER, EpochId(1), &[alice], &[Decimal::new(4_000, 0)])
        .unwrap();
    assert_eq!(h.engine.reward_balance(alice), Decimal::new(4_000, 0));
    let err = h
        .engine
        .manual_distribution(OWNER, EpochId(1), &[alice], &[Decimal::ONE])
        .unwrap_err();
    assert!(matches!(err, ForecastError::AlreadyDistributed(_)));
}

// =============================================================================
// Test: late reports close the epoch but are themselves rejected
// =============================================================================
#[test]
fn e2e_late_report_closes_epoch() {
    let mut h = Harness::new();
    let alice = trader(1);
    h.report(alice, 50, h.at(days(1)));

    // The first call after the deadline trips the lazy close; the report
    // itself is rejected and no points are recorded.
    let event = TraderEvent {
        user: alice,
        market: MarketId::new(),
        volume: 100,
        position_time: h.genesis,
        creation_time: h.genesis,
        duration: days(7),
        correct_side_liquidity: 100,
        total_liquidity: 100,
        position_size: 50,
    };
    let before = h.engine.live_score(alice, Role::Trader);
    let err = h
        .engine
        .report_trader_event(MARKET, &event, h.at(days(8)))
        .unwrap_err();
    assert!(matches!(err, ForecastError::EpochNotAccepting(_)));
    assert_eq!(h.engine.live_score(alice, Role::Trader), before);
    assert_eq!(
        h.engine.epoch_record(EpochId(1)).unwrap().status,
        EpochStatus::PendingFinalize
    );
    assert!(h
        .engine
        .events()
        .iter()
        .any(|e| matches!(e, EngineEvent::EpochClosed { epoch: EpochId(1) })));
}

// =============================================================================
// Test: epochs advance monotonically, by exactly one
// =============================================================================
#[test]
fn e2e_monotonic_epoch_counter() {
    let mut h = Harness::new();
    for round in 1..=3u64 {
        assert_eq!(h.engine.current_epoch(), EpochId(round));
        let now = h.at(days(7 * round + 1));
        h.engine
            .submit_leaderboard(
                SUBMITTER,
                EpochId(round),
                &LeaderboardSubmission::default(),
                now,
            )
            .unwrap();
        assert_eq!(h.engine.current_epoch(), EpochId(round + 1));
    }
}

// =============================================================================
// Test: batch catch-up over consecutive epochs
// =============================================================================
#[test]
fn e2e_batch_catch_up() {
    // A grace window longer than the epoch lets the submitter catch up
    // on more than one missed epoch in a single call.
    let mut h = Harness::with_windows(days(7), days(14));
    let alice = trader(1);
    h.fund(1_000, h.at(days(1)));
    h.report(alice, 50, h.at(days(1)));

    // Outage: nothing happens until day 15 — epoch 1 closed at day 7 and
    // epoch 2 (day 7 – day 14) elapsed entirely unattended.
    let batch = vec![
        (EpochId(1), h.ranking_of(&[alice])),
        (EpochId(2), LeaderboardSubmission::default()),
    ];
    let paid = h
        .engine
        .submit_leaderboard_batch(SUBMITTER, &batch, h.at(days(15)))
        .unwrap();
    assert_eq!(paid, Decimal::new(250, 0));

    assert_eq!(
        h.engine.epoch_record(EpochId(1)).unwrap().status,
        EpochStatus::Finalized
    );
    assert_eq!(
        h.engine.epoch_record(EpochId(2)).unwrap().status,
        EpochStatus::Finalized
    );
    assert_eq!(h.engine.current_epoch(), EpochId(3));

    // Epoch 2 began at epoch 1's nominal deadline, keeping the cadence.
    assert_eq!(
        h.engine.epoch_record(EpochId(2)).unwrap().start_time,
        h.at(days(7))
    );
}

#[test]
fn e2e_batch_rejects_gaps_and_empties() {
    let mut h = Harness::new();
    let err = h
        .engine
        .submit_leaderboard_batch(SUBMITTER, &[], h.at(days(8)))
        .unwrap_err();
    assert!(matches!(err, ForecastError::EmptyBatch));

    let batch = vec![
        (EpochId(1), LeaderboardSubmission::default()),
        (EpochId(3), LeaderboardSubmission::default()),
    ];
    let err = h
        .engine
        .submit_leaderboard_batch(SUBMITTER, &batch, h.at(days(8)))
        .unwrap_err();
    assert!(matches!(
        err,
        ForecastError::NonConsecutiveEpochs {
            previous: EpochId(1),
            next: EpochId(3),
        }
    ));
    // Nothing was finalized by the rejected batches.
    assert_eq!(h.engine.current_epoch(), EpochId(1));
}

// =============================================================================
// Test: notifications carry the audit trail
// =============================================================================
#[test]
fn e2e_event_stream_audit() {
    let mut h = Harness::new();
    let alice = trader(1);
    h.fund(1_000, h.at(days(1)));
    h.report(alice, 50, h.at(days(1)));
    let ranking = h.ranking_of(&[alice]);
    h.engine
        .submit_leaderboard(SUBMITTER, EpochId(1), &ranking, h.at(days(8)))
        .unwrap();

    let events = h.engine.drain_events();
    let mut kinds = events.iter();
    assert!(kinds.any(|e| matches!(e, EngineEvent::PoolContribution { epoch: EpochId(1), .. })));
    assert!(kinds.any(|e| matches!(e, EngineEvent::EpochClosed { epoch: EpochId(1) })));
    assert!(kinds.any(|e| matches!(
        e,
        EngineEvent::LeaderboardSubmitted {
            epoch: EpochId(1),
            trader_entries: 1,
            ..
        }
    )));
    assert!(kinds.any(|e| matches!(
        e,
        EngineEvent::RewardsDistributed {
            epoch: EpochId(1),
            backdated: false,
            ..
        }
    )));
    assert!(kinds.any(|e| matches!(e, EngineEvent::EpochOpened { epoch: EpochId(2), .. })));
}

// =============================================================================
// Test: creators are ranked and stored but never paid from the pool
// =============================================================================
#[test]
fn e2e_creators_ranked_not_paid() {
    let mut h = Harness::new();
    let carol = trader(9);
    h.fund(1_000, h.at(days(1)));
    let event = CreatorEvent {
        creator: carol,
        market: MarketId::new(),
        volume: 200,
        trade_count: 30,
    };
    let points = h
        .engine
        .report_creator_event(MARKET, &event, h.at(days(1)))
        .unwrap();
    assert!(points > 0);

    let submission = LeaderboardSubmission {
        ranked_traders: Vec::new(),
        trader_points: Vec::new(),
        ranked_creators: vec![carol],
        creator_points: vec![points],
    };
    let paid = h
        .engine
        .submit_leaderboard(SUBMITTER, EpochId(1), &submission, h.at(days(8)))
        .unwrap();

    // The creator ranking is stored, but the pool only pays traders.
    assert_eq!(paid, Decimal::ZERO);
    assert_eq!(h.engine.reward_balance(carol), Decimal::ZERO);
    let top = h.engine.top_performers(EpochId(1), Role::Creator).unwrap();
    assert_eq!(top, &[TopPerformer { address: carol, points }]);
    assert_eq!(
        h.engine.epoch_record(EpochId(1)).unwrap().pool,
        Decimal::new(1_000, 0)
    );
}

// =============================================================================
// Test: break-glass sweep drains every pool to the owner
// =============================================================================
#[test]
fn e2e_emergency_withdraw() {
    let mut h = Harness::new();
    h.fund(900, h.at(days(1)));

    let err = h.engine.emergency_withdraw(MARKET).unwrap_err();
    assert!(matches!(err, ForecastError::NotOwner(_)));

    let swept = h.engine.emergency_withdraw(OWNER).unwrap();
    assert_eq!(swept, Decimal::new(900, 0));
    assert_eq!(h.engine.reward_balance(OWNER), Decimal::new(900, 0));
    assert_eq!(h.engine.epoch_record(EpochId(1)).unwrap().pool, Decimal::ZERO);
}

// =============================================================================
// Test: the frozen history survives the roll untouched
// =============================================================================
#[test]
fn e2e_frozen_history_survives_roll() {
    let mut h = Harness::with_windows(days(7), days(14));
    let alice = trader(1);
    h.fund(1_000, h.at(days(1)));
    h.report(alice, 50, h.at(days(1)));
    let frozen = h.engine.live_score(alice, Role::Trader);

    let submission = h.ranking_of(&[alice]);
    h.engine
        .submit_leaderboard(SUBMITTER, EpochId(1), &submission, h.at(days(8)))
        .unwrap();

    // New live points in epoch 2 do not disturb epoch 1's frozen record.
    h.report(alice, 10, h.at(days(9)));
    assert_eq!(
        h.engine.historical_score(EpochId(1), alice, Role::Trader),
        frozen
    );
    assert_ne!(
        h.engine.live_score(alice, Role::Trader),
        frozen
    );
}
