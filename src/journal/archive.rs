//! JSON and CSV archives of the journal.
//!
//! JSON import is a merge: rows are upserted by id, so restoring an old
//! export never wipes trades recorded since. CSV export keeps the column
//! names of the original spreadsheet exports.

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::warn;

use crate::clock::format_ts;
use crate::error::Result;
use crate::journal::daybook::Daybook;
use crate::models::{TradeRecord, TradeStatus};

pub const CSV_HEADERS: [&str; 18] = [
    "Trade #",
    "Futures Type",
    "Size",
    "Stop Loss (pts)",
    "Risk ($)",
    "Status",
    "Points Realized",
    "Realized P&L",
    "Entry Time",
    "Exit Time",
    "Trade came to me",
    "With Value",
    "Score",
    "Entry Quality",
    "Emotional State",
    "Sizing",
    "Notes",
    "Market Conditions",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

pub fn default_export_name(now: NaiveDateTime) -> String {
    now.format("journal_export_%Y%m%d_%H%M%S.json").to_string()
}

/// Write every record as a pretty-printed JSON array. Returns the count.
pub fn export_json(book: &Daybook, path: impl AsRef<Path>) -> Result<usize> {
    let records = book.all_records()?;
    let json = serde_json::to_string_pretty(&records)?;
    fs::write(path, json)?;
    Ok(records.len())
}

/// Merge a JSON archive into the journal. Rows that fail to deserialize are
/// counted and logged, never fatal.
pub fn import_json(book: &Daybook, path: impl AsRef<Path>) -> Result<ImportSummary> {
    let raw = fs::read_to_string(path)?;
    let rows: Vec<Value> = serde_json::from_str(&raw)?;

    let mut imported = 0;
    let mut skipped = 0;
    for (i, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<TradeRecord>(row) {
            Ok(mut record) => {
                normalize_imported(&mut record);
                book.upsert_imported(&record)?;
                imported += 1;
            }
            Err(e) => {
                warn!("skipping import row {i}: {e}");
                skipped += 1;
            }
        }
    }
    Ok(ImportSummary { imported, skipped })
}

/// Older exports used the two-state Active/Closed scheme. "Closed" lands
/// here as Active; a record carrying a booked P&L gets its real end state
/// back from the P&L sign.
fn normalize_imported(record: &mut TradeRecord) {
    if record.status == TradeStatus::Active {
        if let Some(pnl) = record.realized_pnl {
            record.status = TradeStatus::for_pnl(pnl);
        }
    }
}

/// Spreadsheet-friendly export with display formatting.
pub fn export_csv(book: &Daybook, path: impl AsRef<Path>) -> Result<usize> {
    let records = book.all_records()?;
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(CSV_HEADERS)?;
    for r in &records {
        wtr.write_record(&[
            r.trade_num.to_string(),
            r.instrument.clone(),
            r.size.to_string(),
            r.stop_loss_points.map(|v| v.to_string()).unwrap_or_default(),
            money(r.risk_dollars),
            r.status.as_str().to_string(),
            r.points_realized.clone().unwrap_or_default(),
            money(r.realized_pnl),
            format_ts(r.entry_time),
            r.exit_time.map(format_ts).unwrap_or_default(),
            tag(r.came_to_me.map(|v| v.as_str())),
            tag(r.with_value.map(|v| v.as_str())),
            tag(r.score.map(|v| v.as_str())),
            tag(r.entry_quality.map(|v| v.as_str())),
            tag(r.emotional_state.map(|v| v.as_str())),
            r.sizing.as_str().to_string(),
            r.notes.clone(),
            tag(r.market_conditions.map(|v| v.as_str())),
        ])?;
    }
    wtr.flush()?;
    Ok(records.len())
}

fn money(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn tag(v: Option<&str>) -> String {
    v.unwrap_or_default().to_string()
}
