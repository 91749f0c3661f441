//! Idle clock — measures real elapsed time between idle advances.
//!
//! The engine is interval-agnostic. The ticker samples the wall clock
//! each period and sends the measured duration, so scheduling jitter
//! neither loses nor invents cups.

use crate::command::{CommandSender, PlayerCommand};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default polling period for the idle ticker.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct IdleClock {
    last: Instant,
}

impl IdleClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { last: start }
    }

    /// Seconds since the previous sample. Resets the reference point.
    pub fn sample(&mut self) -> f64 {
        self.sample_at(Instant::now())
    }

    /// Same as `sample`, with an explicit "now". A `now` earlier than the
    /// last sample yields zero rather than a negative duration.
    pub fn sample_at(&mut self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.last);
        if now > self.last {
            self.last = now;
        }
        elapsed.as_secs_f64()
    }
}

impl Default for IdleClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a running idle ticker thread.
pub struct IdleTicker {
    running: Arc<AtomicBool>,
    handle:  Option<JoinHandle<()>>,
}

impl IdleTicker {
    /// Spawn a thread that sends `IdleAdvance` with measured time every `period`.
    pub fn spawn(sender: CommandSender, period: Duration) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = thread::spawn(move || {
            let mut clock = IdleClock::new();
            while flag.load(Ordering::Relaxed) {
                thread::sleep(period);
                let elapsed_seconds = clock.sample();
                if sender.send(PlayerCommand::IdleAdvance { elapsed_seconds }).is_err() {
                    log::debug!("idle ticker: queue closed, stopping");
                    break;
                }
            }
        });
        Self { running, handle: Some(handle) }
    }

    /// Stop the ticker and wait for the thread to exit.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("idle ticker: thread panicked");
            }
        }
    }
}

impl Drop for IdleTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
