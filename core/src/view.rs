//! Read models for presentation layers: balances, per-producer and
//! per-upgrade status with display strings already formatted.

use crate::{
    condition::is_unlocked,
    formula::{format_amount, producer_rate, purchase_cost, total_production_rate, unit_rate},
    state::{EconomyState, UpgradeEffect},
    types::{ProducerKind, UpgradeKind},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProducerView {
    pub kind:       ProducerKind,
    pub name:       String,
    pub icon:       String,
    pub owned:      u64,
    pub cost:       f64,
    pub unit_rate:  f64,
    pub total_rate: f64,
    pub affordable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeView {
    pub kind:       UpgradeKind,
    pub name:       String,
    pub icon:       String,
    pub effect:     UpgradeEffect,
    pub multiplier: f64,
    pub cost:       f64,
    pub purchased:  bool,
    pub unlocked:   bool,
    pub affordable: bool,
    /// What is still needed, e.g. "Requires 5x Hire Barista".
    pub hint:       Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomySummary {
    pub cups:            f64,
    pub money:           f64,
    pub click_power:     f64,
    pub production_rate: f64,
    pub total_clicks:    u64,
    pub total_upgrades:  u64,
    pub achievements:    usize,
}

impl EconomySummary {
    /// One-line status, e.g. `Cups: 1.20K | Money: $850 | Production: 12.5 cups/sec`.
    pub fn status_line(&self) -> String {
        format!(
            "Cups: {} | Money: ${} | Production: {:.1} cups/sec",
            format_amount(self.cups),
            format_amount(self.money),
            self.production_rate
        )
    }
}

impl ProducerView {
    pub fn label(&self) -> String {
        format!(
            "{} (x{}) - Cost: ${} - +{}/sec",
            self.name,
            self.owned,
            format_amount(self.cost),
            self.unit_rate
        )
    }
}

impl UpgradeView {
    pub fn label(&self) -> String {
        if self.purchased {
            format!("{} (BOUGHT)", self.name)
        } else if let (false, Some(hint)) = (self.unlocked, &self.hint) {
            format!("{} - {hint}", self.name)
        } else {
            format!("{} - Cost: ${}", self.name, format_amount(self.cost))
        }
    }
}

impl EconomyState {
    pub fn production_rate(&self) -> f64 {
        total_production_rate(self.producers.values())
    }

    pub fn summary(&self) -> EconomySummary {
        EconomySummary {
            cups:            self.lifetime_produced,
            money:           self.spendable_balance,
            click_power:     self.click_power,
            production_rate: self.production_rate(),
            total_clicks:    self.total_clicks,
            total_upgrades:  self.total_upgrades_purchased,
            achievements:    self.achievements.len(),
        }
    }

    pub fn producer_views(&self) -> Vec<ProducerView> {
        self.producers
            .iter()
            .map(|(kind, p)| {
                let cost = purchase_cost(p);
                ProducerView {
                    kind:       *kind,
                    name:       p.name.clone(),
                    icon:       p.icon.clone(),
                    owned:      p.owned,
                    cost,
                    unit_rate:  unit_rate(p),
                    total_rate: producer_rate(p),
                    affordable: self.spendable_balance >= cost,
                }
            })
            .collect()
    }

    pub fn upgrade_views(&self) -> Vec<UpgradeView> {
        self.upgrades
            .iter()
            .map(|(kind, u)| {
                let unlocked = is_unlocked(self, u);
                UpgradeView {
                    kind:       *kind,
                    name:       u.name.clone(),
                    icon:       u.icon.clone(),
                    effect:     u.effect,
                    multiplier: u.multiplier,
                    cost:       u.cost,
                    purchased:  u.purchased,
                    unlocked,
                    affordable: !u.purchased && unlocked && self.spendable_balance >= u.cost,
                    hint:       u.unlock.hint(self),
                }
            })
            .collect()
    }
}
