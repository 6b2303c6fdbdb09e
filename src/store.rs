//! SQLite persistence for trade rows and the pressing index.
//!
//! Timestamps are stored as `%Y-%m-%d %H:%M:%S` text, statuses and tags as
//! their display strings. An unknown stored status or tag degrades to
//! Active/blank with a logged warning instead of failing the fetch; only a
//! corrupt entry time fails the row.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, warn};

use crate::clock::{format_ts, parse_ts, DATE_FORMAT};
use crate::error::{JournalError, Result};
use crate::models::{
    Confirmation, EmotionalState, EntryQuality, MarketConditions, Score, Sizing, TradeRecord,
    TradeStatus,
};

const PRESSING_KEY: &str = "pressing_index";

const COLUMNS: &str = "id, trade_num, instrument, size, stop_loss_points, risk_dollars, \
     status, points_realized, realized_pnl, entry_time, exit_time, came_to_me, with_value, \
     market_conditions, score, entry_quality, emotional_state, sizing, notes";

pub struct TradeStore {
    conn: Connection,
}

impl TradeStore {
    /// Open (or create) the journal database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_tables()?;
        store.run_migrations()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_tables()?;
        store.run_migrations()?;
        Ok(store)
    }

    fn init_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS trades (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                trade_num INTEGER NOT NULL DEFAULT 0,
                instrument TEXT NOT NULL,
                size REAL NOT NULL,
                stop_loss_points REAL,
                risk_dollars REAL,
                status TEXT NOT NULL DEFAULT 'Active',
                points_realized TEXT,
                realized_pnl REAL,
                entry_time TEXT NOT NULL,
                exit_time TEXT,
                came_to_me TEXT,
                with_value TEXT,
                market_conditions TEXT,
                score TEXT,
                entry_quality TEXT,
                emotional_state TEXT,
                sizing TEXT NOT NULL DEFAULT 'Base',
                notes TEXT NOT NULL DEFAULT ''
            );
            CREATE INDEX IF NOT EXISTS idx_trades_entry_time ON trades(entry_time);

            CREATE TABLE IF NOT EXISTS journal_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Add columns introduced after the first schema version.
    fn run_migrations(&self) -> Result<()> {
        let columns: Vec<String> = self
            .conn
            .prepare("PRAGMA table_info(trades)")?
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if !columns.contains(&"market_conditions".to_string()) {
            self.conn
                .execute("ALTER TABLE trades ADD COLUMN market_conditions TEXT", [])?;
            info!("migration: added market_conditions column to trades");
        }

        Ok(())
    }

    pub fn insert(&self, record: &TradeRecord) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO trades (trade_num, instrument, size, stop_loss_points, risk_dollars, \
             status, points_realized, realized_pnl, entry_time, exit_time, came_to_me, \
             with_value, market_conditions, score, entry_quality, emotional_state, sizing, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            params![
                record.trade_num,
                record.instrument,
                record.size,
                record.stop_loss_points,
                record.risk_dollars,
                record.status.as_str(),
                record.points_realized,
                record.realized_pnl,
                format_ts(record.entry_time),
                record.exit_time.map(format_ts),
                record.came_to_me.map(|v| v.as_str()),
                record.with_value.map(|v| v.as_str()),
                record.market_conditions.map(|v| v.as_str()),
                record.score.map(|v| v.as_str()),
                record.entry_quality.map(|v| v.as_str()),
                record.emotional_state.map(|v| v.as_str()),
                record.sizing.as_str(),
                record.notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Rewrite every column except `id` and `trade_num`; the ordinal is fixed
    /// at creation.
    pub fn update(&self, id: i64, record: &TradeRecord) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE trades SET instrument = ?1, size = ?2, stop_loss_points = ?3, \
             risk_dollars = ?4, status = ?5, points_realized = ?6, realized_pnl = ?7, \
             entry_time = ?8, exit_time = ?9, came_to_me = ?10, with_value = ?11, \
             market_conditions = ?12, score = ?13, entry_quality = ?14, emotional_state = ?15, \
             sizing = ?16, notes = ?17
             WHERE id = ?18",
            params![
                record.instrument,
                record.size,
                record.stop_loss_points,
                record.risk_dollars,
                record.status.as_str(),
                record.points_realized,
                record.realized_pnl,
                format_ts(record.entry_time),
                record.exit_time.map(format_ts),
                record.came_to_me.map(|v| v.as_str()),
                record.with_value.map(|v| v.as_str()),
                record.market_conditions.map(|v| v.as_str()),
                record.score.map(|v| v.as_str()),
                record.entry_quality.map(|v| v.as_str()),
                record.emotional_state.map(|v| v.as_str()),
                record.sizing.as_str(),
                record.notes,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(JournalError::UnknownTrade(id));
        }
        Ok(())
    }

    /// Insert, or replace the whole row when the record carries an id.
    pub fn upsert(&self, record: &TradeRecord) -> Result<i64> {
        match record.id {
            None => self.insert(record),
            Some(id) => {
                self.conn.execute(
                    "INSERT OR REPLACE INTO trades (id, trade_num, instrument, size, \
                     stop_loss_points, risk_dollars, status, points_realized, realized_pnl, \
                     entry_time, exit_time, came_to_me, with_value, market_conditions, score, \
                     entry_quality, emotional_state, sizing, notes)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19)",
                    params![
                        id,
                        record.trade_num,
                        record.instrument,
                        record.size,
                        record.stop_loss_points,
                        record.risk_dollars,
                        record.status.as_str(),
                        record.points_realized,
                        record.realized_pnl,
                        format_ts(record.entry_time),
                        record.exit_time.map(format_ts),
                        record.came_to_me.map(|v| v.as_str()),
                        record.with_value.map(|v| v.as_str()),
                        record.market_conditions.map(|v| v.as_str()),
                        record.score.map(|v| v.as_str()),
                        record.entry_quality.map(|v| v.as_str()),
                        record.emotional_state.map(|v| v.as_str()),
                        record.sizing.as_str(),
                        record.notes,
                    ],
                )?;
                Ok(id)
            }
        }
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM trades WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(JournalError::UnknownTrade(id));
        }
        Ok(())
    }

    pub fn get(&self, id: i64) -> Result<Option<TradeRecord>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM trades WHERE id = ?1"),
                params![id],
                row_to_record,
            )
            .optional()?;
        Ok(row)
    }

    pub fn fetch_all(&self) -> Result<Vec<TradeRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {COLUMNS} FROM trades ORDER BY entry_time ASC"))?;
        let rows = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn fetch_by_date(&self, date: NaiveDate) -> Result<Vec<TradeRecord>> {
        let prefix = format!("{}%", date.format(DATE_FORMAT));
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COLUMNS} FROM trades WHERE entry_time LIKE ?1 ORDER BY entry_time ASC"
        ))?;
        let rows = stmt
            .query_map(params![prefix], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn load_pressing_index(&self) -> Result<usize> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM journal_state WHERE key = ?1",
                params![PRESSING_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value
            .and_then(|v| {
                v.parse().ok().or_else(|| {
                    warn!("unreadable pressing index '{v}' in store, starting at 0");
                    None
                })
            })
            .unwrap_or(0))
    }

    pub fn save_pressing_index(&self, index: usize) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO journal_state (key, value) VALUES (?1, ?2)",
            params![PRESSING_KEY, index.to_string()],
        )?;
        Ok(())
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<TradeRecord> {
    let status_raw: String = row.get(6)?;
    let entry_raw: String = row.get(9)?;
    let entry_time = parse_ts(&entry_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            9,
            rusqlite::types::Type::Text,
            format!("bad entry_time '{entry_raw}'").into(),
        )
    })?;
    let exit_raw: Option<String> = row.get(10)?;
    let exit_time = exit_raw.as_deref().and_then(|raw| {
        let parsed = parse_ts(raw);
        if parsed.is_none() {
            warn!("unreadable exit_time '{raw}' in store, treating as unset");
        }
        parsed
    });
    let sizing_raw: String = row.get(17)?;

    Ok(TradeRecord {
        id: Some(row.get(0)?),
        trade_num: row.get::<_, i64>(1)? as u32,
        instrument: row.get(2)?,
        size: row.get(3)?,
        stop_loss_points: row.get(4)?,
        risk_dollars: row.get(5)?,
        status: parse_status(&status_raw),
        points_realized: row.get(7)?,
        realized_pnl: row.get(8)?,
        entry_time,
        exit_time,
        came_to_me: parse_tag(row.get(11)?, Confirmation::parse, "came_to_me"),
        with_value: parse_tag(row.get(12)?, Confirmation::parse, "with_value"),
        market_conditions: parse_tag(row.get(13)?, MarketConditions::parse, "market_conditions"),
        score: parse_tag(row.get(14)?, Score::parse, "score"),
        entry_quality: parse_tag(row.get(15)?, EntryQuality::parse, "entry_quality"),
        emotional_state: parse_tag(row.get(16)?, EmotionalState::parse, "emotional_state"),
        sizing: Sizing::parse(&sizing_raw).unwrap_or_else(|| {
            warn!("unknown sizing '{sizing_raw}' in store, treating as Base");
            Sizing::Base
        }),
        notes: row.get(18)?,
    })
}

fn parse_status(raw: &str) -> TradeStatus {
    TradeStatus::parse(raw).unwrap_or_else(|| {
        warn!("unknown status '{raw}' in store, treating as Active");
        TradeStatus::Active
    })
}

fn parse_tag<T>(raw: Option<String>, parse: impl Fn(&str) -> Option<T>, what: &str) -> Option<T> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    match parse(&raw) {
        Some(v) => Some(v),
        None => {
            warn!("unknown {what} '{raw}' in store, treating as blank");
            None
        }
    }
}
