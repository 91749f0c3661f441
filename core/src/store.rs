//! SQLite persistence layer for save slots.
//!
//! RULE: Only store.rs talks to the database.
//! The engine never touches SQL; callers decide when to save.

use crate::{
    codec::{self, SaveRecord},
    config::EconomyConfig,
    error::{EconError, EconResult},
    state::EconomyState,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

const SELECT_COLUMNS: &str =
    "SELECT id, cups, money, click_power, total_clicks, total_upgrades,
            achievements, producers, upgrades
     FROM game_state";

pub struct SaveStore {
    conn: Connection,
}

impl SaveStore {
    /// Open (or create) the save database at `path`.
    pub fn open(path: &str) -> EconResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> EconResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> EconResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_game_state.sql"))?;
        Ok(())
    }

    // ── Rows ───────────────────────────────────────────────────

    /// Insert a new slot. Returns its id. Any id on the record is ignored.
    pub fn create(&self, record: &SaveRecord) -> EconResult<i64> {
        self.conn.execute(
            "INSERT INTO game_state (
                cups, money, click_power, total_clicks, total_upgrades,
                achievements, producers, upgrades
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.cups,
                record.money,
                record.click_power,
                record.total_clicks,
                record.total_upgrades,
                &record.achievements,
                &record.producers,
                &record.upgrades,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        log::info!("store: created save slot {id}");
        Ok(id)
    }

    pub fn read(&self, id: i64) -> EconResult<Option<SaveRecord>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let record = self
            .conn
            .query_row(&sql, params![id], record_from_row)
            .optional()?;
        Ok(record)
    }

    pub fn read_all(&self) -> EconResult<Vec<SaveRecord>> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY id ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], record_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Overwrite slot `id`. Fails with SlotNotFound if no such slot exists.
    pub fn update(&self, id: i64, record: &SaveRecord) -> EconResult<()> {
        let changed = self.conn.execute(
            "UPDATE game_state SET
                cups = ?1, money = ?2, click_power = ?3, total_clicks = ?4,
                total_upgrades = ?5, achievements = ?6, producers = ?7, upgrades = ?8
             WHERE id = ?9",
            params![
                record.cups,
                record.money,
                record.click_power,
                record.total_clicks,
                record.total_upgrades,
                &record.achievements,
                &record.producers,
                &record.upgrades,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(EconError::SlotNotFound { id });
        }
        log::debug!("store: updated save slot {id}");
        Ok(())
    }

    /// Returns whether a slot was removed.
    pub fn delete(&self, id: i64) -> EconResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM game_state WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    // ── Economy state ──────────────────────────────────────────

    pub fn save_new(&self, state: &EconomyState) -> EconResult<i64> {
        self.create(&codec::encode(state)?)
    }

    pub fn save(&self, id: i64, state: &EconomyState) -> EconResult<()> {
        self.update(id, &codec::encode(state)?)
    }

    /// Load and decode slot `id`.
    pub fn load(&self, id: i64, config: &EconomyConfig) -> EconResult<EconomyState> {
        let record = self.read(id)?.ok_or(EconError::SlotNotFound { id })?;
        codec::decode(&record, config)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<SaveRecord> {
    Ok(SaveRecord {
        id:             Some(row.get(0)?),
        cups:           row.get(1)?,
        money:          row.get(2)?,
        click_power:    row.get(3)?,
        total_clicks:   row.get(4)?,
        total_upgrades: row.get(5)?,
        achievements:   row.get(6)?,
        producers:      row.get(7)?,
        upgrades:       row.get(8)?,
    })
}
