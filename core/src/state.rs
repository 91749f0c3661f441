//! The economy aggregate — balances, producers, upgrades, counters.
//!
//! RULE: State is only mutated by the action functions and the
//! achievement evaluator. Everything else reads through accessors.
//!
//! Cups and money are two views of one resource stream:
//!   - `lifetime_produced` (cups) only ever grows.
//!   - `spendable_balance` (money) grows with every gain and is the
//!     only view lowered by purchases. It never goes negative.

use crate::{
    condition::UnlockCondition,
    config::EconomyConfig,
    types::{AchievementId, ProducerKind, UpgradeKind},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One producer kind: its catalog numbers plus how many are owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerDef {
    pub name: String,
    /// Cups per second produced by one unit before multipliers.
    #[serde(rename = "baseProd")]
    pub base_rate: f64,
    #[serde(rename = "baseCost")]
    pub base_cost: f64,
    #[serde(rename = "costMul")]
    pub cost_multiplier: f64,
    #[serde(rename = "qty", default)]
    pub owned: u64,
    #[serde(rename = "mult", default = "unit_multiplier")]
    pub multiplier: f64,
    #[serde(default)]
    pub icon: String,
}

fn unit_multiplier() -> f64 {
    1.0
}

impl ProducerDef {
    pub fn new(name: &str, base_rate: f64, base_cost: f64, cost_multiplier: f64) -> Self {
        Self {
            name: name.to_string(),
            base_rate,
            base_cost,
            cost_multiplier,
            owned: 0,
            multiplier: 1.0,
            icon: String::new(),
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }
}

/// What an upgrade multiplies when bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpgradeEffect {
    Click,
    Producer { target: ProducerKind },
}

/// A one-shot purchasable multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDef {
    #[serde(flatten)]
    pub effect: UpgradeEffect,
    pub name: String,
    #[serde(rename = "mult")]
    pub multiplier: f64,
    pub cost: f64,
    #[serde(default)]
    pub purchased: bool,
    #[serde(rename = "unlock_at", default)]
    pub unlock: UnlockCondition,
    #[serde(default)]
    pub icon: String,
}

impl UpgradeDef {
    pub fn click(name: &str, multiplier: f64, cost: f64, unlock: UnlockCondition) -> Self {
        Self {
            effect: UpgradeEffect::Click,
            name: name.to_string(),
            multiplier,
            cost,
            purchased: false,
            unlock,
            icon: String::new(),
        }
    }

    pub fn producer(
        name: &str,
        target: ProducerKind,
        multiplier: f64,
        cost: f64,
        unlock: UnlockCondition,
    ) -> Self {
        Self {
            effect: UpgradeEffect::Producer { target },
            ..Self::click(name, multiplier, cost, unlock)
        }
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EconomyState {
    pub(crate) lifetime_produced:        f64,
    pub(crate) spendable_balance:        f64,
    pub(crate) click_power:              f64,
    pub(crate) total_clicks:             u64,
    pub(crate) total_upgrades_purchased: u64,
    pub(crate) achievements:             Vec<AchievementId>,
    pub(crate) producers:                BTreeMap<ProducerKind, ProducerDef>,
    pub(crate) upgrades:                 BTreeMap<UpgradeKind, UpgradeDef>,
}

impl EconomyState {
    /// Fresh save slot built from the configured catalog.
    pub fn new(config: &EconomyConfig) -> Self {
        Self {
            lifetime_produced:        0.0,
            spendable_balance:        config.starting_balance,
            click_power:              config.click_power,
            total_clicks:             0,
            total_upgrades_purchased: 0,
            achievements:             Vec::new(),
            producers:                config.producers.clone(),
            upgrades:                 config.upgrades.clone(),
        }
    }

    pub fn lifetime_produced(&self) -> f64 { self.lifetime_produced }
    pub fn spendable_balance(&self) -> f64 { self.spendable_balance }
    pub fn click_power(&self) -> f64 { self.click_power }
    pub fn total_clicks(&self) -> u64 { self.total_clicks }
    pub fn total_upgrades_purchased(&self) -> u64 { self.total_upgrades_purchased }

    /// Unlocked achievements in the order they were first earned.
    pub fn achievements(&self) -> &[AchievementId] {
        &self.achievements
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a == id)
    }

    pub fn producers(&self) -> &BTreeMap<ProducerKind, ProducerDef> {
        &self.producers
    }

    pub fn producer(&self, kind: ProducerKind) -> Option<&ProducerDef> {
        self.producers.get(&kind)
    }

    pub fn upgrades(&self) -> &BTreeMap<UpgradeKind, UpgradeDef> {
        &self.upgrades
    }

    pub fn upgrade(&self, kind: UpgradeKind) -> Option<&UpgradeDef> {
        self.upgrades.get(&kind)
    }

    /// Credit a gain to both resource views at once.
    pub(crate) fn credit(&mut self, amount: f64) {
        self.lifetime_produced += amount;
        self.spendable_balance += amount;
    }

    /// Spend from the balance. Callers check affordability first.
    pub(crate) fn debit(&mut self, amount: f64) {
        self.spendable_balance = (self.spendable_balance - amount).max(0.0);
    }
}
