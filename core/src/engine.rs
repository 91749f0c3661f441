//! The economy engine — single owner of one session's state.
//!
//! EXECUTION ORDER (fixed for every call):
//!   1. Run the action (validate, then commit or reject).
//!   2. Record the action's event.
//!   3. Evaluate achievements and record any unlocks.
//!
//! RULES:
//!   - Every mutation goes through `&mut self`, one at a time.
//!   - Other threads never touch the state; they send commands
//!     through `sender()` and the owner calls `drain_commands()`.
//!   - Readers on other threads get a cloned `snapshot()`.

use crate::{
    achievement::{self, AchievementDef},
    actions,
    command::{CommandQueue, CommandSender, PlayerCommand},
    config::EconomyConfig,
    error::Rejection,
    event::EconomyEvent,
    state::EconomyState,
    types::{ProducerKind, UpgradeKind},
};

pub struct EconomyEngine {
    state:        EconomyState,
    achievements: Vec<AchievementDef>,
    queue:        CommandQueue,
    events:       Vec<EconomyEvent>,
}

impl EconomyEngine {
    /// Fresh session from the catalog.
    pub fn new(config: &EconomyConfig) -> Self {
        Self::from_state(EconomyState::new(config), config)
    }

    /// Resume a session from a decoded save.
    pub fn from_state(state: EconomyState, config: &EconomyConfig) -> Self {
        Self {
            state,
            achievements: config.achievements.clone(),
            queue:        CommandQueue::new(),
            events:       Vec::new(),
        }
    }

    pub fn state(&self) -> &EconomyState {
        &self.state
    }

    /// Immutable copy for readers outside the owning context.
    pub fn snapshot(&self) -> EconomyState {
        self.state.clone()
    }

    pub fn into_state(self) -> EconomyState {
        self.state
    }

    // ── Actions ────────────────────────────────────────────────

    /// Manual brew. Always succeeds; returns the cups gained.
    pub fn brew(&mut self) -> f64 {
        let amount = actions::brew(&mut self.state);
        self.events.push(EconomyEvent::Gain { amount });
        self.check_achievements();
        amount
    }

    /// Returns the price paid.
    pub fn buy_producer(&mut self, kind: ProducerKind) -> Result<f64, Rejection> {
        let result = actions::buy_producer(&mut self.state, kind);
        match &result {
            Ok(cost) => {
                let owned = self.state.producer(kind).map_or(0, |p| p.owned);
                self.events.push(EconomyEvent::ProducerPurchased { kind, cost: *cost, owned });
            }
            Err(reason) => self.reject(reason),
        }
        self.check_achievements();
        result
    }

    /// Returns the price paid.
    pub fn buy_upgrade(&mut self, kind: UpgradeKind) -> Result<f64, Rejection> {
        let result = actions::buy_upgrade(&mut self.state, kind);
        match &result {
            Ok((cost, effect)) => {
                self.events.push(EconomyEvent::UpgradePurchased {
                    kind,
                    cost: *cost,
                    effect: *effect,
                });
            }
            Err(reason) => self.reject(reason),
        }
        self.check_achievements();
        result.map(|(cost, _)| cost)
    }

    /// Accrue production for a measured duration. Returns the cups gained.
    pub fn idle_advance(&mut self, elapsed_seconds: f64) -> Result<f64, Rejection> {
        let result = actions::idle_advance(&mut self.state, elapsed_seconds);
        match &result {
            Ok(amount) if elapsed_seconds > 0.0 => {
                self.events.push(EconomyEvent::IdleAccrued {
                    seconds: elapsed_seconds,
                    amount: *amount,
                });
            }
            Ok(_) => {}
            Err(reason) => self.reject(reason),
        }
        self.check_achievements();
        result
    }

    /// Apply one command and return the events it produced.
    pub fn apply(&mut self, command: PlayerCommand) -> Vec<EconomyEvent> {
        // Rejections are already captured as events.
        match command {
            PlayerCommand::Brew => {
                self.brew();
            }
            PlayerCommand::BuyProducer { kind } => {
                let _ = self.buy_producer(kind);
            }
            PlayerCommand::BuyUpgrade { kind } => {
                let _ = self.buy_upgrade(kind);
            }
            PlayerCommand::IdleAdvance { elapsed_seconds } => {
                let _ = self.idle_advance(elapsed_seconds);
            }
        }
        self.take_events()
    }

    // ── Command queue ──────────────────────────────────────────

    pub fn sender(&self) -> CommandSender {
        self.queue.sender()
    }

    /// Apply every queued command in arrival order.
    pub fn drain_commands(&mut self) -> Vec<EconomyEvent> {
        let mut events = Vec::new();
        while let Some(queued) = self.queue.try_next() {
            log::trace!("engine: applying command #{} {:?}", queued.seq, queued.command);
            events.extend(self.apply(queued.command));
        }
        events
    }

    // ── Events ─────────────────────────────────────────────────

    /// Events recorded since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<EconomyEvent> {
        std::mem::take(&mut self.events)
    }

    fn reject(&mut self, reason: &Rejection) {
        log::warn!("engine: rejected: {reason}");
        self.events.push(EconomyEvent::Rejected { reason: reason.clone() });
    }

    fn check_achievements(&mut self) {
        for id in achievement::evaluate(&self.achievements, &mut self.state) {
            self.events.push(EconomyEvent::AchievementUnlocked { id });
        }
    }
}
