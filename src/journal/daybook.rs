//! Orchestration for one journal database: collects an edit, runs the
//! reconciler, persists the corrected row, and advances the pressing streak.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::clock::JournalClock;
use crate::config::Config;
use crate::core::exposure::{compute_exposure, DayExposure};
use crate::core::parse::round2;
use crate::core::pressing::{self, fold_outcomes, PressingState, RoadmapStep};
use crate::core::reconcile::{reconcile, PointsEvent, ReconcileWarning};
use crate::core::stats::{compute_stats, JournalStats};
use crate::error::{JournalError, Result};
use crate::models::{Outcome, Sizing, TradeRecord};
use crate::store::TradeStore;

/// User-supplied fields for a new trade; anything left out comes from the
/// configured defaults.
#[derive(Debug, Clone, Default)]
pub struct TradeDraft {
    pub instrument: Option<String>,
    pub size: Option<f64>,
    pub stop_loss_points: Option<f64>,
    pub points: Option<String>,
    pub sizing: Option<Sizing>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EditSummary {
    pub record: TradeRecord,
    pub outcome: Outcome,
    pub pressing: PressingState,
    pub warnings: Vec<ReconcileWarning>,
}

#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub records: Vec<TradeRecord>,
    pub deleted: usize,
    pub outcome: Outcome,
    pub pressing: PressingState,
    pub warnings: Vec<ReconcileWarning>,
}

pub struct Daybook {
    cfg: Config,
    store: TradeStore,
    clock: JournalClock,
    pressing: PressingState,
}

impl Daybook {
    pub fn open(cfg: Config) -> Result<Self> {
        let tz = cfg.tz()?;
        let store = TradeStore::open(&cfg.database_path)?;
        Self::with_store(cfg, store, JournalClock::new(tz))
    }

    /// Wire up an explicit store and clock; `open` goes through here too.
    pub fn with_store(cfg: Config, store: TradeStore, clock: JournalClock) -> Result<Self> {
        // A persisted index from a since-shortened sequence snaps into range.
        let top = cfg.pressing_multipliers.len().saturating_sub(1);
        let index = store.load_pressing_index()?.min(top);
        Ok(Self {
            cfg,
            store,
            clock,
            pressing: PressingState::new(index),
        })
    }

    /// Create a trade from config defaults plus whatever the draft overrides,
    /// reconcile it as a new record, and persist it.
    pub fn add_trade(&mut self, draft: TradeDraft) -> Result<TradeRecord> {
        let now = self.clock.now();
        let instrument = draft
            .instrument
            .unwrap_or_else(|| self.cfg.default_instrument.clone());
        let size = draft.size.unwrap_or(self.cfg.default_size);
        let trade_num = self.next_trade_num(now.date())?;
        if trade_num > self.cfg.max_trades_per_day {
            warn!(
                "trade {} goes past the {}-trade daily cap",
                trade_num, self.cfg.max_trades_per_day
            );
        }

        let mut record = TradeRecord::new(trade_num, instrument, size, now);
        record.stop_loss_points = draft
            .stop_loss_points
            .or_else(|| self.default_stop(&record.instrument, size));
        record.sizing = draft.sizing.unwrap_or_default();
        record.notes = draft.notes.unwrap_or_default();
        record.set_points(draft.points.as_deref());

        let out = reconcile(&record, None, &self.cfg.instruments, now);
        self.log_warnings(&out.warnings);
        let mut record = out.record;
        let id = self.store.insert(&record)?;
        record.id = Some(id);
        self.advance_pressing(out.outcome)?;
        info!("added trade #{trade_num} (id {id}) on {}", record.instrument);
        Ok(record)
    }

    /// Reconcile an edited record against its persisted version, write it
    /// back, and advance the streak by the resulting outcome.
    pub fn apply_edit(&mut self, edited: TradeRecord) -> Result<EditSummary> {
        let id = edited.id.ok_or(JournalError::MissingId)?;
        let previous = self.store.get(id)?.ok_or(JournalError::UnknownTrade(id))?;

        let out = reconcile(&edited, Some(&previous), &self.cfg.instruments, self.clock.now());
        self.log_warnings(&out.warnings);
        let mut record = out.record;
        record.id = Some(id);
        record.trade_num = previous.trade_num;
        self.store.update(id, &record)?;
        self.advance_pressing(out.outcome)?;

        Ok(EditSummary {
            record,
            outcome: out.outcome,
            pressing: self.pressing,
            warnings: out.warnings,
        })
    }

    /// Record the exit points for a trade.
    pub fn close_trade(&mut self, id: i64, points: &str) -> Result<EditSummary> {
        let mut edited = self.get(id)?;
        edited.set_points(Some(points));
        self.apply_edit(edited)
    }

    /// Clear the exit points, putting the trade back to Active.
    pub fn reopen_trade(&mut self, id: i64) -> Result<EditSummary> {
        let mut edited = self.get(id)?;
        edited.set_points(None);
        self.apply_edit(edited)
    }

    /// Apply a set of edits and deletions as one pass. Row outcomes are
    /// folded into a single streak signal; any deletion or un-realization in
    /// the batch forces a reset.
    pub fn apply_batch(
        &mut self,
        edits: Vec<TradeRecord>,
        deletions: &[i64],
    ) -> Result<BatchSummary> {
        let now = self.clock.now();
        let mut records = Vec::with_capacity(edits.len());
        let mut outcomes = Vec::with_capacity(edits.len());
        let mut warnings = Vec::new();
        let mut force_reset = false;

        for edited in edits {
            let previous = match edited.id {
                Some(id) => Some(self.store.get(id)?.ok_or(JournalError::UnknownTrade(id))?),
                None => None,
            };
            let out = reconcile(&edited, previous.as_ref(), &self.cfg.instruments, now);
            self.log_warnings(&out.warnings);
            let mut record = out.record;
            match (record.id, &previous) {
                (Some(id), Some(prev)) => {
                    record.trade_num = prev.trade_num;
                    self.store.update(id, &record)?;
                }
                _ => {
                    let id = self.store.insert(&record)?;
                    record.id = Some(id);
                }
            }
            if out.points_event == Some(PointsEvent::Unrealized) {
                force_reset = true;
            }
            outcomes.push(out.outcome);
            warnings.extend(out.warnings);
            records.push(record);
        }

        for &id in deletions {
            self.store.delete(id)?;
            force_reset = true;
        }

        let outcome = fold_outcomes(&outcomes, force_reset);
        self.advance_pressing(outcome)?;

        Ok(BatchSummary {
            records,
            deleted: deletions.len(),
            outcome,
            pressing: self.pressing,
            warnings,
        })
    }

    /// Remove a trade. Deleting counts as a loss for the streak.
    pub fn delete_trade(&mut self, id: i64) -> Result<()> {
        self.store.delete(id)?;
        self.advance_pressing(Outcome::Loss)?;
        info!("deleted trade {id}; pressing reset");
        Ok(())
    }

    pub fn get(&self, id: i64) -> Result<TradeRecord> {
        self.store.get(id)?.ok_or(JournalError::UnknownTrade(id))
    }

    pub fn day_records(&self, date: NaiveDate) -> Result<Vec<TradeRecord>> {
        self.store.fetch_by_date(date)
    }

    pub fn all_records(&self) -> Result<Vec<TradeRecord>> {
        self.store.fetch_all()
    }

    pub fn exposure(&self, date: NaiveDate) -> Result<DayExposure> {
        let records = self.day_records(date)?;
        Ok(compute_exposure(&records, self.cfg.daily_risk))
    }

    pub fn stats(&self) -> Result<JournalStats> {
        Ok(compute_stats(&self.all_records()?))
    }

    pub fn pressing(&self) -> PressingState {
        self.pressing
    }

    pub fn roadmap(&self) -> Vec<RoadmapStep> {
        pressing::roadmap(&self.cfg, self.pressing)
    }

    pub fn suggested_size(&self) -> f64 {
        pressing::suggested_size(&self.cfg, self.pressing)
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn now(&self) -> chrono::NaiveDateTime {
        self.clock.now()
    }

    pub(crate) fn upsert_imported(&self, record: &TradeRecord) -> Result<i64> {
        self.store.upsert(record)
    }

    /// Stop distance that would commit the whole daily risk budget.
    fn default_stop(&self, instrument: &str, size: f64) -> Option<f64> {
        let mf = self.cfg.instruments.multiplier(instrument)?;
        if size > 0.0 && mf > 0.0 {
            Some(round2(self.cfg.daily_risk / (size * mf)))
        } else {
            None
        }
    }

    fn next_trade_num(&self, date: NaiveDate) -> Result<u32> {
        let day = self.store.fetch_by_date(date)?;
        Ok(day.iter().map(|r| r.trade_num).max().unwrap_or(0) + 1)
    }

    fn advance_pressing(&mut self, outcome: Outcome) -> Result<()> {
        let next = self
            .pressing
            .advance(outcome, self.cfg.pressing_multipliers.len());
        if next != self.pressing {
            info!("pressing step {} -> {}", self.pressing.index, next.index);
            self.pressing = next;
            self.store.save_pressing_index(next.index)?;
        }
        Ok(())
    }

    fn log_warnings(&self, warnings: &[ReconcileWarning]) {
        for w in warnings {
            warn!("{w}");
        }
    }
}
