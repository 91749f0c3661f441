use crate::{
    achievement::AchievementDef,
    codec::ACHIEVEMENT_DELIMITER,
    condition::{Condition, UnlockCondition},
    error::{EconError, EconResult},
    state::{ProducerDef, UpgradeDef, UpgradeEffect},
    types::{ProducerKind, UpgradeKind},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// The catalog an economy is built from: which producers and upgrades
/// exist, their numbers, and the ordered achievement list.
///
/// The kind sets fixed here are the only ones a session will accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyConfig {
    #[serde(default)]
    pub starting_balance: f64,
    #[serde(default = "default_click_power")]
    pub click_power: f64,
    pub producers: BTreeMap<ProducerKind, ProducerDef>,
    pub upgrades: BTreeMap<UpgradeKind, UpgradeDef>,
    #[serde(default)]
    pub achievements: Vec<AchievementDef>,
}

fn default_click_power() -> f64 {
    1.0
}

impl EconomyConfig {
    /// Load a catalog from a JSON file.
    /// In tests, use EconomyConfig::default().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: EconomyConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        log::info!(
            "config: loaded {path} ({} producers, {} upgrades, {} achievements)",
            config.producers.len(),
            config.upgrades.len(),
            config.achievements.len()
        );
        Ok(config)
    }

    /// Reject catalogs the engine cannot run safely.
    pub fn validate(&self) -> EconResult<()> {
        if !(self.click_power >= 1.0) {
            return Err(EconError::config(format!(
                "click_power must be at least 1, got {}",
                self.click_power
            )));
        }
        if !(self.starting_balance >= 0.0) {
            return Err(EconError::config("starting_balance must be non-negative"));
        }

        for (kind, p) in &self.producers {
            if !(p.cost_multiplier > 1.0) {
                return Err(EconError::config(format!(
                    "producer {kind}: costMul must be greater than 1, got {}",
                    p.cost_multiplier
                )));
            }
            if !(p.base_cost >= 0.0) || !(p.base_rate >= 0.0) || !(p.multiplier >= 0.0) {
                return Err(EconError::config(format!(
                    "producer {kind}: cost, rate and multiplier must be non-negative"
                )));
            }
        }

        for (kind, u) in &self.upgrades {
            if !(u.multiplier > 1.0) {
                return Err(EconError::config(format!(
                    "upgrade {kind}: mult must be greater than 1, got {}",
                    u.multiplier
                )));
            }
            if !(u.cost >= 0.0) {
                return Err(EconError::config(format!("upgrade {kind}: cost must be non-negative")));
            }
            if let UpgradeEffect::Producer { target } = u.effect {
                if !self.producers.contains_key(&target) {
                    return Err(EconError::config(format!(
                        "upgrade {kind}: target producer {target} is not configured"
                    )));
                }
            }
            self.warn_unconfigured(&format!("upgrade {kind}"), &u.unlock);
        }

        let mut seen = HashSet::new();
        for a in &self.achievements {
            if a.id.trim().is_empty() || a.id.trim() != a.id {
                return Err(EconError::config(format!(
                    "achievement id '{}' must be non-empty without surrounding spaces",
                    a.id
                )));
            }
            if a.id.contains(ACHIEVEMENT_DELIMITER.trim()) {
                return Err(EconError::config(format!(
                    "achievement id '{}' contains the record delimiter",
                    a.id
                )));
            }
            if !seen.insert(a.id.as_str()) {
                return Err(EconError::config(format!("duplicate achievement id '{}'", a.id)));
            }
            self.warn_unconfigured(&format!("achievement {}", a.id), &a.when);
        }
        Ok(())
    }

    // A check on an unconfigured producer is a catalog mistake, but the
    // evaluator treats it as permanently locked, so it is reported, not fatal.
    fn warn_unconfigured(&self, owner: &str, condition: &UnlockCondition) {
        for check in condition.checks() {
            if let Condition::Producer(kind, _) = check {
                if !self.producers.contains_key(kind) {
                    log::warn!("config: {owner} waits on unconfigured producer {kind}; it will never unlock");
                }
            }
        }
    }
}

impl Default for EconomyConfig {
    /// The Coffee Empire catalog.
    fn default() -> Self {
        use crate::types::ProducerKind as P;
        use crate::types::UpgradeKind as U;

        let producers = BTreeMap::from([
            (P::Barista,   ProducerDef::new("Hire Barista",           1.0,    2.0,      1.15).with_icon("barista.png")),
            (P::Machine,   ProducerDef::new("Buy Coffee Machine",     5.0,    50.0,     1.15).with_icon("machine.png")),
            (P::Shop,      ProducerDef::new("Open Coffee Shop",       20.0,   200.0,    1.15).with_icon("shop.png")),
            (P::Farmer,    ProducerDef::new("Hire Coffee Farmer",     100.0,  1_000.0,  1.15).with_icon("farmer.png")),
            (P::Factory,   ProducerDef::new("Build Coffee Factory",   500.0,  10_000.0, 1.15).with_icon("factory.png")),
            (P::Franchise, ProducerDef::new("Start Global Franchise", 5000.0, 100_000.0, 1.15).with_icon("franchise.png")),
        ]);

        let upgrades = BTreeMap::from([
            (U::StrongerHands, UpgradeDef::click("Stronger Hands", 2.0, 50.0, UnlockCondition::money(20.0))
                .with_icon("stronger_hands.png")),
            (U::TurboBrewing, UpgradeDef::click("Turbo Brewing", 3.0, 250.0, UnlockCondition::money(100.0))
                .with_icon("turbo_brewing.png")),
            (U::BetterBeans, UpgradeDef::producer("Better Beans", P::Barista, 2.0, 100.0, UnlockCondition::producer(P::Barista, 5))
                .with_icon("better_beans.png")),
            (U::ColdBrew, UpgradeDef::producer("Cold Brew", P::Barista, 2.5, 10_000.0, UnlockCondition::producer(P::Barista, 75))
                .with_icon("cold_brew.png")),
            (U::Espresso, UpgradeDef::producer("Espresso Machines", P::Machine, 2.0, 500.0, UnlockCondition::producer(P::Machine, 5))
                .with_icon("espresso.png")),
            (U::Branding, UpgradeDef::producer("Global Branding", P::Shop, 2.0, 2_000.0, UnlockCondition::producer(P::Shop, 5))
                .with_icon("branding.png")),
        ]);

        let achievements = vec![
            AchievementDef::new("First Brew",        "Brew your first cup",        UnlockCondition::clicks(1)),
            AchievementDef::new("Hundred Clicks",    "Brew 100 cups by hand",      UnlockCondition::clicks(100)),
            AchievementDef::new("First Hire",        "Hire your first barista",    UnlockCondition::producer(P::Barista, 1)),
            AchievementDef::new("Bean Tycoon",       "Brew 1,000 cups in total",   UnlockCondition::cups(1_000.0)),
            AchievementDef::new("Upgrade Collector", "Buy 3 upgrades",             UnlockCondition::upgrades(3)),
            AchievementDef::new("Coffee Magnate",    "Brew 1,000,000 cups in total", UnlockCondition::cups(1_000_000.0)),
        ];

        Self {
            starting_balance: 0.0,
            click_power: 1.0,
            producers,
            upgrades,
            achievements,
        }
    }
}
