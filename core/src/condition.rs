//! Unlock conditions — the predicate vocabulary shared by upgrade
//! gating and achievements.
//!
//! A condition set is a map of named checks. Every check must hold.
//! Persisted shape: `{"money": 20}` or `{"producer": ["barista", 5]}`;
//! an empty map means "always unlocked".

use crate::{
    formula::format_amount,
    state::{EconomyState, UpgradeDef},
    types::ProducerKind,
};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// One named check over the economy state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Spendable balance at or above the threshold.
    Money(f64),
    /// Lifetime cups brewed at or above the threshold.
    Cups(f64),
    /// Owned quantity of a producer at or above the threshold.
    Producer(ProducerKind, u64),
    Clicks(u64),
    Upgrades(u64),
}

impl Condition {
    /// Key under which this check is stored in a condition map.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Money(_)       => "money",
            Self::Cups(_)        => "cups",
            Self::Producer(_, _) => "producer",
            Self::Clicks(_)      => "clicks",
            Self::Upgrades(_)    => "upgrades",
        }
    }

    /// A producer missing from the state never satisfies its check.
    pub fn holds(&self, state: &EconomyState) -> bool {
        match self {
            Self::Money(t)    => state.spendable_balance() >= *t,
            Self::Cups(t)     => state.lifetime_produced() >= *t,
            Self::Producer(kind, t) => state
                .producer(*kind)
                .is_some_and(|p| p.owned >= *t),
            Self::Clicks(t)   => state.total_clicks() >= *t,
            Self::Upgrades(t) => state.total_upgrades_purchased() >= *t,
        }
    }

    pub fn hint(&self, state: &EconomyState) -> String {
        match self {
            Self::Money(t) => format!("Requires ${}", format_amount(*t)),
            Self::Cups(t)  => format!("Requires {} cups brewed", format_amount(*t)),
            Self::Producer(kind, t) => {
                let name = state
                    .producer(*kind)
                    .map(|p| p.name.as_str())
                    .unwrap_or(kind.as_str());
                format!("Requires {t}x {name}")
            }
            Self::Clicks(t)   => format!("Requires {t} brews"),
            Self::Upgrades(t) => format!("Requires {t} upgrades"),
        }
    }
}

/// A set of checks, all of which must hold.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct UnlockCondition {
    // Sorted by check name, one check per name.
    checks: Vec<Condition>,
}

impl UnlockCondition {
    pub fn always() -> Self {
        Self::default()
    }

    pub fn money(threshold: f64) -> Self {
        Self::always().and(Condition::Money(threshold))
    }

    pub fn cups(threshold: f64) -> Self {
        Self::always().and(Condition::Cups(threshold))
    }

    pub fn producer(kind: ProducerKind, threshold: u64) -> Self {
        Self::always().and(Condition::Producer(kind, threshold))
    }

    pub fn clicks(threshold: u64) -> Self {
        Self::always().and(Condition::Clicks(threshold))
    }

    pub fn upgrades(threshold: u64) -> Self {
        Self::always().and(Condition::Upgrades(threshold))
    }

    /// Add a check. A check with the same name replaces the old one.
    pub fn and(mut self, check: Condition) -> Self {
        self.checks.retain(|c| c.name() != check.name());
        self.checks.push(check);
        self.checks.sort_by_key(|c| c.name());
        self
    }

    pub fn checks(&self) -> &[Condition] {
        &self.checks
    }

    pub fn is_always(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn holds(&self, state: &EconomyState) -> bool {
        self.checks.iter().all(|c| c.holds(state))
    }

    /// Human-readable requirement, `None` when there is nothing to meet.
    pub fn hint(&self, state: &EconomyState) -> Option<String> {
        if self.checks.is_empty() {
            return None;
        }
        let parts: Vec<String> = self.checks.iter().map(|c| c.hint(state)).collect();
        Some(parts.join(" and "))
    }
}

impl Serialize for UnlockCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.checks.len()))?;
        for check in &self.checks {
            match check {
                Condition::Money(t)          => map.serialize_entry(check.name(), t)?,
                Condition::Cups(t)           => map.serialize_entry(check.name(), t)?,
                Condition::Producer(kind, t) => map.serialize_entry(check.name(), &(kind, t))?,
                Condition::Clicks(t)         => map.serialize_entry(check.name(), t)?,
                Condition::Upgrades(t)       => map.serialize_entry(check.name(), t)?,
            }
        }
        map.end()
    }
}

impl TryFrom<Map<String, Value>> for UnlockCondition {
    type Error = serde_json::Error;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut condition = Self::always();
        for (name, value) in map {
            let mut entry = Map::new();
            entry.insert(name, value);
            let check: Condition = serde_json::from_value(Value::Object(entry))?;
            condition = condition.and(check);
        }
        Ok(condition)
    }
}

/// Whether an upgrade may be shown and bought right now.
///
/// Never fails: a condition naming a producer this economy does not
/// configure simply stays locked.
pub fn is_unlocked(state: &EconomyState, upgrade: &UpgradeDef) -> bool {
    upgrade.unlock.holds(state)
}
