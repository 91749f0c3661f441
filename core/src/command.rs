//! Player commands and the single-consumer queue that orders them.
//!
//! RULE: Anything that wants to change a running economy from another
//! thread (an idle timer, an input loop) sends a command. Only the
//! engine's owner applies them, one at a time, in arrival order.

use crate::{
    error::{EconError, EconResult},
    types::{ProducerKind, UpgradeKind},
};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};

/// Variants added at the end — never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    Brew,
    BuyProducer { kind: ProducerKind },
    BuyUpgrade { kind: UpgradeKind },
    IdleAdvance { elapsed_seconds: f64 },
}

/// A command with its arrival sequence number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedCommand {
    pub seq:     u64,
    pub command: PlayerCommand,
}

/// Cloneable producer side of the queue. Safe to move into other threads.
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: Sender<PlayerCommand>,
}

impl CommandSender {
    pub fn send(&self, command: PlayerCommand) -> EconResult<()> {
        self.tx.send(command).map_err(|_| EconError::QueueClosed)
    }
}

/// Consumer side, owned by whoever owns the economy.
#[derive(Debug)]
pub struct CommandQueue {
    tx:       Sender<PlayerCommand>,
    rx:       Receiver<PlayerCommand>,
    // Read ahead while merging idle advances.
    pending:  Option<PlayerCommand>,
    next_seq: u64,
}

impl CommandQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx, pending: None, next_seq: 0 }
    }

    pub fn sender(&self) -> CommandSender {
        CommandSender { tx: self.tx.clone() }
    }

    /// Next pending command, if any. Never blocks.
    ///
    /// Back-to-back idle advances are merged into one.
    pub fn try_next(&mut self) -> Option<QueuedCommand> {
        // The queue holds its own sender, so `try_recv` only fails when empty.
        let mut command = self.pending.take().or_else(|| self.rx.try_recv().ok())?;
        if let PlayerCommand::IdleAdvance { elapsed_seconds: total } = &mut command {
            while let Ok(next) = self.rx.try_recv() {
                match next {
                    PlayerCommand::IdleAdvance { elapsed_seconds } if mergeable(*total, elapsed_seconds) => {
                        *total += elapsed_seconds;
                    }
                    other => {
                        self.pending = Some(other);
                        break;
                    }
                }
            }
        }
        self.next_seq += 1;
        Some(QueuedCommand { seq: self.next_seq, command })
    }
}

// Invalid durations stay separate so each is rejected on its own.
fn mergeable(total: f64, next: f64) -> bool {
    let valid = |s: f64| s.is_finite() && s >= 0.0;
    valid(total) && valid(next) && valid(total + next)
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
