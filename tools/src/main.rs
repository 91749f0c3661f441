//! coffee-runner: headless runner for the Coffee Empire economy.
//!
//! Usage:
//!   coffee-runner --ticks 600 --clicks-per-tick 3 --db coffee.db
//!   coffee-runner --db coffee.db --slot 1 --ipc-mode
//!   coffee-runner --config catalog.json --ticks 120

use anyhow::Result;
use coffee_core::{
    clock::{IdleTicker, DEFAULT_TICK_PERIOD},
    command::PlayerCommand,
    config::EconomyConfig,
    engine::EconomyEngine,
    event::EconomyEvent,
    formula::format_amount,
    store::SaveStore,
    types::{ProducerKind, UpgradeKind},
    view::{EconomySummary, ProducerView, UpgradeView},
};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Brew,
    BuyProducer { kind: ProducerKind },
    BuyUpgrade { kind: UpgradeKind },
    Save,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    slot:      i64,
    summary:   EconomySummary,
    status:    String,
    producers: Vec<ProducerView>,
    upgrades:  Vec<UpgradeView>,
    events:    Vec<EconomyEvent>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ticks = parse_arg(&args, "--ticks", 600u64);
    let clicks_per_tick = parse_arg(&args, "--clicks-per-tick", 3u32);
    let tick_ms = parse_arg(&args, "--tick-ms", DEFAULT_TICK_PERIOD.as_millis() as u64);
    let slot_arg = parse_arg(&args, "--slot", 0i64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");

    let config = match string_arg(&args, "--config") {
        Some(path) => EconomyConfig::load(path)?,
        None => EconomyConfig::default(),
    };

    if !ipc_mode {
        println!("Coffee Empire — coffee-runner");
        println!("  ticks:           {ticks}");
        println!("  clicks per tick: {clicks_per_tick}");
        println!("  db:              {db}");
        println!();
    }

    let store = if db == ":memory:" {
        SaveStore::in_memory()?
    } else {
        SaveStore::open(db)?
    };
    store.migrate()?;

    let (slot, mut engine) = if slot_arg > 0 {
        let state = store.load(slot_arg, &config)?;
        log::info!("runner: resumed save slot {slot_arg}");
        (slot_arg, EconomyEngine::from_state(state, &config))
    } else {
        let engine = EconomyEngine::new(&config);
        let slot = store.save_new(engine.state())?;
        (slot, engine)
    };

    if ipc_mode {
        run_ipc_loop(&mut engine, &store, slot, Duration::from_millis(tick_ms))?;
    } else {
        autoplay(&mut engine, ticks, clicks_per_tick);
        store.save(slot, engine.state())?;
        print_summary(&engine, slot, ticks);
    }

    Ok(())
}

/// Greedy headless player: brew, buy every unlocked upgrade it can
/// afford, then the cheapest producer, then let one second pass.
fn autoplay(engine: &mut EconomyEngine, ticks: u64, clicks_per_tick: u32) {
    for _ in 0..ticks {
        for _ in 0..clicks_per_tick {
            engine.apply(PlayerCommand::Brew);
        }

        let ready: Vec<UpgradeKind> = engine
            .state()
            .upgrade_views()
            .into_iter()
            .filter(|u| u.affordable)
            .map(|u| u.kind)
            .collect();
        for kind in ready {
            engine.apply(PlayerCommand::BuyUpgrade { kind });
        }

        let cheapest = engine
            .state()
            .producer_views()
            .into_iter()
            .filter(|p| p.affordable)
            .min_by(|a, b| a.cost.total_cmp(&b.cost));
        if let Some(p) = cheapest {
            engine.apply(PlayerCommand::BuyProducer { kind: p.kind });
        }

        for event in engine.apply(PlayerCommand::IdleAdvance { elapsed_seconds: 1.0 }) {
            if let EconomyEvent::AchievementUnlocked { id } = event {
                println!("  achievement unlocked: {id}");
            }
        }
    }
}

fn run_ipc_loop(
    engine: &mut EconomyEngine,
    store: &SaveStore,
    slot: i64,
    period: Duration,
) -> Result<()> {
    // The ticker and the input loop both feed the engine's queue;
    // only this thread applies commands.
    let mut ticker = IdleTicker::spawn(engine.sender(), period);
    let sender = engine.sender();

    // Stdin is read on its own thread so the queue is drained every
    // period even while no input arrives.
    let (line_tx, line_rx) = mpsc::channel::<io::Result<String>>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut stdout = io::stdout();
    // Events applied between requests, reported with the next response.
    let mut feed: Vec<EconomyEvent> = Vec::new();

    loop {
        let buffer = match line_rx.recv_timeout(period) {
            Ok(line) => line?,
            Err(RecvTimeoutError::Timeout) => {
                feed.extend(feed_events(engine.drain_commands()));
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => break, // EOF
        };
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let mut save = false;
        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {}
            IpcCommand::Save => save = true,
            IpcCommand::Brew => sender.send(PlayerCommand::Brew)?,
            IpcCommand::BuyProducer { kind } => sender.send(PlayerCommand::BuyProducer { kind })?,
            IpcCommand::BuyUpgrade { kind } => sender.send(PlayerCommand::BuyUpgrade { kind })?,
        }

        feed.extend(feed_events(engine.drain_commands()));
        if save {
            store.save(slot, engine.state())?;
        }
        let state = build_ui_state(engine, slot, std::mem::take(&mut feed));
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }

    ticker.stop();
    engine.drain_commands();
    store.save(slot, engine.state())?;
    log::info!("runner: saved slot {slot} on exit");
    Ok(())
}

fn build_ui_state(engine: &EconomyEngine, slot: i64, events: Vec<EconomyEvent>) -> UiState {
    let snapshot = engine.snapshot();
    let summary = snapshot.summary();
    UiState {
        slot,
        status: summary.status_line(),
        summary,
        producers: snapshot.producer_views(),
        upgrades: snapshot.upgrade_views(),
        events,
    }
}

// Idle accruals arrive every tick; keep the feed readable.
fn feed_events(events: Vec<EconomyEvent>) -> impl Iterator<Item = EconomyEvent> {
    events
        .into_iter()
        .filter(|e| !matches!(e, EconomyEvent::IdleAccrued { .. }))
}

fn print_summary(engine: &EconomyEngine, slot: i64, ticks: u64) {
    let state = engine.state();
    let summary = state.summary();

    println!();
    println!("=== RUN SUMMARY ===");
    println!("  slot:           {slot}");
    println!("  seconds played: {ticks}");
    println!("  {}", summary.status_line());
    println!("  click power:    {}", format_amount(summary.click_power));
    println!("  total clicks:   {}", summary.total_clicks);
    println!("  upgrades:       {}", summary.total_upgrades);

    println!();
    println!("=== PRODUCERS ===");
    for p in state.producer_views() {
        println!("  {}", p.label());
    }

    println!();
    println!("=== UPGRADES ===");
    for u in state.upgrade_views() {
        println!("  {}", u.label());
    }

    println!();
    println!("=== ACHIEVEMENTS ===");
    if state.achievements().is_empty() {
        println!("  (none yet)");
    } else {
        for id in state.achievements() {
            println!("  {id}");
        }
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
