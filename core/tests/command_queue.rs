//! Command queue tests — arrival order, cross-thread senders, idle ticker.

use coffee_core::{
    clock::{IdleClock, IdleTicker},
    command::PlayerCommand,
    config::EconomyConfig,
    engine::EconomyEngine,
    error::Rejection,
    event::EconomyEvent,
    types::ProducerKind,
};
use std::thread;
use std::time::{Duration, Instant};

fn engine_with_balance(balance: f64) -> EconomyEngine {
    EconomyEngine::new(&EconomyConfig {
        starting_balance: balance,
        ..EconomyConfig::default()
    })
}

#[test]
fn commands_apply_in_arrival_order() {
    // 1 money + 1 brew is exactly one barista; the other order is too early.
    let mut brew_first = engine_with_balance(1.0);
    let tx = brew_first.sender();
    tx.send(PlayerCommand::Brew).unwrap();
    tx.send(PlayerCommand::BuyProducer { kind: ProducerKind::Barista }).unwrap();
    brew_first.drain_commands();
    assert_eq!(brew_first.state().producer(ProducerKind::Barista).unwrap().owned, 1);

    let mut buy_first = engine_with_balance(1.0);
    let tx = buy_first.sender();
    tx.send(PlayerCommand::BuyProducer { kind: ProducerKind::Barista }).unwrap();
    tx.send(PlayerCommand::Brew).unwrap();
    let events = buy_first.drain_commands();
    assert_eq!(buy_first.state().producer(ProducerKind::Barista).unwrap().owned, 0);
    assert!(matches!(
        events[0],
        EconomyEvent::Rejected { reason: Rejection::InsufficientFunds { .. } }
    ));
}

#[test]
fn senders_on_other_threads_feed_one_owner() {
    let mut engine = engine_with_balance(0.0);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tx = engine.sender();
            thread::spawn(move || {
                for _ in 0..250 {
                    tx.send(PlayerCommand::Brew).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let events = engine.drain_commands();

    assert_eq!(engine.state().total_clicks(), 1_000);
    assert_eq!(engine.state().lifetime_produced(), 1_000.0);
    let gains = events.iter().filter(|e| matches!(e, EconomyEvent::Gain { .. })).count();
    assert_eq!(gains, 1_000);
    assert!(engine.drain_commands().is_empty(), "queue should be empty after drain");
}

#[test]
fn apply_returns_only_that_commands_events() {
    let mut engine = engine_with_balance(0.0);

    let events = engine.apply(PlayerCommand::IdleAdvance { elapsed_seconds: -1.0 });

    assert_eq!(
        events,
        [EconomyEvent::Rejected {
            reason: Rejection::InvalidDuration { seconds: -1.0 }
        }]
    );
}

#[test]
fn idle_clock_measures_elapsed_time() {
    let start = Instant::now();
    let mut clock = IdleClock::starting_at(start);

    assert_eq!(clock.sample_at(start + Duration::from_millis(1_500)), 1.5);
    assert_eq!(clock.sample_at(start + Duration::from_millis(1_750)), 0.25);
    // A stale "now" never produces negative time.
    assert_eq!(clock.sample_at(start + Duration::from_millis(1_000)), 0.0);
    assert_eq!(clock.sample_at(start + Duration::from_millis(2_000)), 0.25);
}

#[test]
fn idle_ticker_sends_measured_advances() {
    let mut engine = engine_with_balance(2.0);
    engine.buy_producer(ProducerKind::Barista).unwrap();
    engine.take_events();

    let mut ticker = IdleTicker::spawn(engine.sender(), Duration::from_millis(5));
    thread::sleep(Duration::from_millis(60));
    ticker.stop();

    let events = engine.drain_commands();
    let accrued: Vec<(f64, f64)> = events
        .iter()
        .filter_map(|e| match e {
            EconomyEvent::IdleAccrued { seconds, amount } => Some((*seconds, *amount)),
            _ => None,
        })
        .collect();

    assert!(!accrued.is_empty(), "ticker produced no idle advances");
    let total_seconds: f64 = accrued.iter().map(|(s, _)| s).sum();
    assert!(total_seconds > 0.0 && total_seconds < 5.0, "implausible total {total_seconds}s");
    // One barista makes one cup per second.
    for (seconds, amount) in accrued {
        assert!((seconds - amount).abs() < 1e-12);
    }
    assert!((engine.state().lifetime_produced() - total_seconds).abs() < 1e-9);
}

#[test]
fn queued_idle_advances_merge_into_one_accrual() {
    let mut engine = engine_with_balance(2.0);
    engine.buy_producer(ProducerKind::Barista).unwrap();
    engine.take_events();

    let tx = engine.sender();
    for _ in 0..4 {
        tx.send(PlayerCommand::IdleAdvance { elapsed_seconds: 0.25 }).unwrap();
    }
    tx.send(PlayerCommand::IdleAdvance { elapsed_seconds: -1.0 }).unwrap();
    tx.send(PlayerCommand::IdleAdvance { elapsed_seconds: 0.5 }).unwrap();
    tx.send(PlayerCommand::Brew).unwrap();
    tx.send(PlayerCommand::IdleAdvance { elapsed_seconds: 0.5 }).unwrap();

    let events = engine.drain_commands();

    assert_eq!(
        events,
        [
            EconomyEvent::IdleAccrued { seconds: 1.0, amount: 1.0 },
            EconomyEvent::Rejected { reason: Rejection::InvalidDuration { seconds: -1.0 } },
            EconomyEvent::IdleAccrued { seconds: 0.5, amount: 0.5 },
            EconomyEvent::Gain { amount: 1.0 },
            EconomyEvent::AchievementUnlocked { id: "First Brew".to_string() },
            EconomyEvent::IdleAccrued { seconds: 0.5, amount: 0.5 },
        ]
    );
    assert_eq!(engine.state().lifetime_produced(), 3.0);
}
