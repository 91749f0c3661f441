//! State codec and save-slot store tests.
//!
//! decode(encode(s)) must reproduce s exactly, and any record that names
//! kinds outside the configured catalog must fail as CorruptRecord.

use coffee_core::{
    codec::{self, SaveRecord},
    config::EconomyConfig,
    engine::EconomyEngine,
    error::EconError,
    state::EconomyState,
    store::SaveStore,
    types::{ProducerKind, UpgradeKind},
};
use serde_json::{json, Value};

fn played_state() -> EconomyState {
    let config = EconomyConfig {
        starting_balance: 10_000.0,
        ..EconomyConfig::default()
    };
    let mut engine = EconomyEngine::new(&config);
    for _ in 0..7 {
        engine.brew();
    }
    for _ in 0..5 {
        engine.buy_producer(ProducerKind::Barista).unwrap();
    }
    engine.buy_producer(ProducerKind::Shop).unwrap();
    engine.buy_upgrade(UpgradeKind::StrongerHands).unwrap();
    engine.buy_upgrade(UpgradeKind::BetterBeans).unwrap();
    engine.idle_advance(3.7).unwrap();
    engine.into_state()
}

fn store() -> SaveStore {
    let store = SaveStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn edit_json(column: &str, edit: impl FnOnce(&mut serde_json::Map<String, Value>)) -> String {
    let mut value: Value = serde_json::from_str(column).unwrap();
    edit(value.as_object_mut().unwrap());
    value.to_string()
}

fn assert_corrupt(record: &SaveRecord) {
    let result = codec::decode(record, &EconomyConfig::default());
    assert!(
        matches!(result, Err(EconError::CorruptRecord { .. })),
        "expected CorruptRecord, got {result:?}"
    );
}

// ── Codec ──────────────────────────────────────────────────────

#[test]
fn round_trip_reproduces_state() {
    let state = played_state();
    assert_eq!(state.achievements(), ["First Brew", "First Hire"]);

    let record = codec::encode(&state).unwrap();
    let decoded = codec::decode(&record, &EconomyConfig::default()).unwrap();

    assert_eq!(decoded, state);
}

#[test]
fn huge_idle_advance_still_saves_and_loads() {
    let mut engine = EconomyEngine::new(&EconomyConfig {
        starting_balance: 2.0,
        ..EconomyConfig::default()
    });
    engine.buy_producer(ProducerKind::Barista).unwrap();
    engine.idle_advance(1e308).unwrap();
    assert!(engine.idle_advance(1e308).is_err(), "overflowing advance must be refused");

    let store = store();
    let id = store.save_new(engine.state()).unwrap();
    let loaded = store.load(id, &EconomyConfig::default()).unwrap();

    assert_eq!(&loaded, engine.state());
}

#[test]
fn record_uses_persisted_field_names() {
    let state = played_state();
    let record = codec::encode(&state).unwrap();

    assert_eq!(record.cups, state.lifetime_produced());
    assert_eq!(record.money, state.spendable_balance());
    assert_eq!(record.click_power, 2.0);
    assert_eq!(record.total_clicks, 7);
    assert_eq!(record.total_upgrades, 2);
    assert_eq!(record.achievements, "First Brew, First Hire");

    let producers: Value = serde_json::from_str(&record.producers).unwrap();
    assert_eq!(
        producers["barista"],
        json!({
            "name": "Hire Barista", "baseProd": 1.0, "baseCost": 2.0, "costMul": 1.15,
            "qty": 5, "mult": 2.0, "icon": "barista.png"
        })
    );

    let upgrades: Value = serde_json::from_str(&record.upgrades).unwrap();
    assert_eq!(upgrades["better_beans"]["type"], "producer");
    assert_eq!(upgrades["better_beans"]["target"], "barista");
    assert_eq!(upgrades["better_beans"]["unlock_at"], json!({ "producer": ["barista", 5] }));
    assert_eq!(upgrades["stronger_hands"]["type"], "click");
    assert_eq!(upgrades["stronger_hands"]["purchased"], true);
    assert!(upgrades["stronger_hands"].get("target").is_none());
}

#[test]
fn unknown_producer_key_is_corrupt() {
    let mut record = codec::encode(&played_state()).unwrap();
    record.producers = edit_json(&record.producers, |m| {
        let barista = m["barista"].clone();
        m.insert("robot".into(), barista);
    });
    assert_corrupt(&record);
}

#[test]
fn producer_outside_configured_set_is_corrupt() {
    let mut config = EconomyConfig::default();
    config.producers.remove(&ProducerKind::Franchise);
    let record = codec::encode(&played_state()).unwrap();

    let result = codec::decode(&record, &config);

    assert!(matches!(result, Err(EconError::CorruptRecord { .. })), "got {result:?}");
}

#[test]
fn missing_upgrade_key_is_corrupt() {
    let mut record = codec::encode(&played_state()).unwrap();
    record.upgrades = edit_json(&record.upgrades, |m| {
        m.remove("cold_brew");
    });
    assert_corrupt(&record);
}

#[test]
fn malformed_columns_are_corrupt() {
    let good = codec::encode(&played_state()).unwrap();

    let mut record = good.clone();
    record.producers = "{not json".into();
    assert_corrupt(&record);

    let mut record = good.clone();
    record.total_clicks = -1;
    assert_corrupt(&record);

    let mut record = good.clone();
    record.money = f64::NAN;
    assert_corrupt(&record);

    let mut record = good.clone();
    record.achievements = "First Brew, First Brew".into();
    assert_corrupt(&record);

    let mut record = good;
    record.upgrades = edit_json(&record.upgrades, |m| {
        m["espresso"]["target"] = json!("spaceship");
    });
    assert_corrupt(&record);
}

#[test]
fn empty_achievement_column_decodes_to_none() {
    let state = EconomyState::new(&EconomyConfig::default());
    let record = codec::encode(&state).unwrap();

    assert_eq!(record.achievements, "");
    let decoded = codec::decode(&record, &EconomyConfig::default()).unwrap();
    assert!(decoded.achievements().is_empty());
}

// ── Store ──────────────────────────────────────────────────────

#[test]
fn save_and_load_slot() {
    let store = store();
    let state = played_state();

    let id = store.save_new(&state).unwrap();
    let loaded = store.load(id, &EconomyConfig::default()).unwrap();

    assert_eq!(loaded, state);
}

#[test]
fn resumed_session_keeps_playing() {
    let store = store();
    let config = EconomyConfig::default();
    let id = store.save_new(&played_state()).unwrap();

    let mut engine = EconomyEngine::from_state(store.load(id, &config).unwrap(), &config);
    engine.brew();
    store.save(id, engine.state()).unwrap();

    let reloaded = store.load(id, &config).unwrap();
    assert_eq!(reloaded.total_clicks(), 8);
    assert_eq!(&reloaded, engine.state());
}

#[test]
fn slots_are_independent() {
    let store = store();
    let fresh = EconomyState::new(&EconomyConfig::default());
    let a = store.save_new(&fresh).unwrap();
    let b = store.save_new(&played_state()).unwrap();

    assert_ne!(a, b);
    let all = store.read_all().unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, Some(a));
    assert_eq!(all[1].total_clicks, 7);
}

#[test]
fn update_and_delete_missing_slot() {
    let store = store();
    let record = codec::encode(&played_state()).unwrap();

    assert!(matches!(store.update(99, &record), Err(EconError::SlotNotFound { id: 99 })));
    assert!(matches!(
        store.load(99, &EconomyConfig::default()),
        Err(EconError::SlotNotFound { id: 99 })
    ));

    let id = store.create(&record).unwrap();
    assert!(store.delete(id).unwrap());
    assert!(!store.delete(id).unwrap());
    assert!(store.read(id).unwrap().is_none());
}

#[test]
fn corrupt_row_refuses_to_load() {
    let store = store();
    let mut record = codec::encode(&played_state()).unwrap();
    record.upgrades = edit_json(&record.upgrades, |m| {
        m.insert("golden_mug".into(), json!({}));
    });
    let id = store.create(&record).unwrap();

    let result = store.load(id, &EconomyConfig::default());

    assert!(matches!(result, Err(EconError::CorruptRecord { .. })), "got {result:?}");
}
