//! State codec — economy state to and from the persisted record shape.
//!
//! RULE: decode either yields a complete state or fails with
//! CorruptRecord. There is no partial load.

use crate::{
    config::EconomyConfig,
    error::{EconError, EconResult},
    state::{EconomyState, ProducerDef, UpgradeDef, UpgradeEffect},
    types::{ProducerKind, UpgradeKind},
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

/// Separator between achievement ids in the `achievements` column.
pub const ACHIEVEMENT_DELIMITER: &str = ", ";

/// One save slot as stored in the `game_state` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Assigned by the store on insert.
    pub id:             Option<i64>,
    pub cups:           f64,
    pub money:          f64,
    pub click_power:    f64,
    pub total_clicks:   i64,
    pub total_upgrades: i64,
    pub achievements:   String,
    /// JSON map: producer kind → producer definition.
    pub producers:      String,
    /// JSON map: upgrade kind → upgrade definition.
    pub upgrades:       String,
}

/// Fails rather than write a record that `decode` would refuse.
pub fn encode(state: &EconomyState) -> EconResult<SaveRecord> {
    check_amount("cups", state.lifetime_produced, 0.0)?;
    check_amount("money", state.spendable_balance, 0.0)?;
    check_amount("click_power", state.click_power, 1.0)?;

    Ok(SaveRecord {
        id:             None,
        cups:           state.lifetime_produced,
        money:          state.spendable_balance,
        click_power:    state.click_power,
        total_clicks:   to_column("total_clicks", state.total_clicks)?,
        total_upgrades: to_column("total_upgrades", state.total_upgrades_purchased)?,
        achievements:   state.achievements.join(ACHIEVEMENT_DELIMITER),
        producers:      serde_json::to_string(&state.producers)?,
        upgrades:       serde_json::to_string(&state.upgrades)?,
    })
}

/// Rebuild a state from a record. Producer and upgrade keys must match
/// the configured kind sets exactly.
pub fn decode(record: &SaveRecord, config: &EconomyConfig) -> EconResult<EconomyState> {
    check_amount("cups", record.cups, 0.0)?;
    check_amount("money", record.money, 0.0)?;
    check_amount("click_power", record.click_power, 1.0)?;

    let producers = decode_producers(&record.producers, config)?;
    let upgrades = decode_upgrades(&record.upgrades, config)?;
    for (kind, u) in &upgrades {
        if let UpgradeEffect::Producer { target } = u.effect {
            if !producers.contains_key(&target) {
                return Err(EconError::corrupt(format!(
                    "upgrade {kind} targets unconfigured producer {target}"
                )));
            }
        }
    }

    Ok(EconomyState {
        lifetime_produced:        record.cups,
        spendable_balance:        record.money,
        click_power:              record.click_power,
        total_clicks:             from_column("total_clicks", record.total_clicks)?,
        total_upgrades_purchased: from_column("total_upgrades", record.total_upgrades)?,
        achievements:             decode_achievements(&record.achievements)?,
        producers,
        upgrades,
    })
}

fn decode_producers(
    json: &str,
    config: &EconomyConfig,
) -> EconResult<BTreeMap<ProducerKind, ProducerDef>> {
    let raw: BTreeMap<String, ProducerDef> = serde_json::from_str(json)
        .map_err(|e| EconError::corrupt(format!("producers: {e}")))?;
    let decoded = keyed_by_kind("producer", raw, |k| {
        ProducerKind::from_str(k).ok().filter(|kind| config.producers.contains_key(kind))
    })?;
    if let Some(missing) = config.producers.keys().find(|k| !decoded.contains_key(*k)) {
        return Err(EconError::corrupt(format!("producer {missing} missing from record")));
    }
    Ok(decoded)
}

fn decode_upgrades(
    json: &str,
    config: &EconomyConfig,
) -> EconResult<BTreeMap<UpgradeKind, UpgradeDef>> {
    let raw: BTreeMap<String, UpgradeDef> = serde_json::from_str(json)
        .map_err(|e| EconError::corrupt(format!("upgrades: {e}")))?;
    let decoded = keyed_by_kind("upgrade", raw, |k| {
        UpgradeKind::from_str(k).ok().filter(|kind| config.upgrades.contains_key(kind))
    })?;
    if let Some(missing) = config.upgrades.keys().find(|k| !decoded.contains_key(*k)) {
        return Err(EconError::corrupt(format!("upgrade {missing} missing from record")));
    }
    Ok(decoded)
}

fn keyed_by_kind<K: Ord, V>(
    what: &str,
    raw: BTreeMap<String, V>,
    resolve: impl Fn(&str) -> Option<K>,
) -> EconResult<BTreeMap<K, V>> {
    raw.into_iter()
        .map(|(key, value)| match resolve(&key) {
            Some(kind) => Ok((kind, value)),
            None => Err(EconError::corrupt(format!("unknown {what} key '{key}'"))),
        })
        .collect()
}

fn decode_achievements(column: &str) -> EconResult<Vec<String>> {
    if column.trim().is_empty() {
        return Ok(Vec::new());
    }
    let mut seen = HashSet::new();
    let mut ids = Vec::new();
    for part in column.split(ACHIEVEMENT_DELIMITER.trim()) {
        let id = part.trim();
        if id.is_empty() {
            return Err(EconError::corrupt("empty achievement id"));
        }
        if !seen.insert(id) {
            return Err(EconError::corrupt(format!("duplicate achievement '{id}'")));
        }
        ids.push(id.to_string());
    }
    Ok(ids)
}

fn check_amount(field: &str, value: f64, min: f64) -> EconResult<()> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(EconError::corrupt(format!("{field} = {value} is out of range")))
    }
}

fn to_column(field: &str, value: u64) -> EconResult<i64> {
    i64::try_from(value).map_err(|_| EconError::corrupt(format!("{field} overflows the record")))
}

fn from_column(field: &str, value: i64) -> EconResult<u64> {
    u64::try_from(value).map_err(|_| EconError::corrupt(format!("{field} = {value} is negative")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_refuses_non_finite_amounts() {
        let mut state = EconomyState::new(&EconomyConfig::default());
        state.lifetime_produced = f64::INFINITY;
        assert!(matches!(encode(&state), Err(EconError::CorruptRecord { .. })));

        let mut state = EconomyState::new(&EconomyConfig::default());
        state.spendable_balance = f64::NAN;
        assert!(matches!(encode(&state), Err(EconError::CorruptRecord { .. })));
    }
}
