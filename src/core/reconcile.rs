//! Derives Risk, P&L, Status and Exit Time from a raw trade edit.
//!
//! `reconcile` is a pure function of (current, previous, catalog, now). The
//! caller persists the corrected record, logs the warnings, and feeds the
//! outcome signal to the pressing tracker.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::config::InstrumentCatalog;
use crate::core::parse::{round2, safe_parse_float};
use crate::models::{Outcome, TradeRecord, TradeStatus};

/// Transition of the points entry between the previous and current record,
/// judged on parsed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsEvent {
    /// Points went absent -> present; the trade just closed.
    Realized,
    /// Points went present -> absent; the trade is live again.
    Unrealized,
}

/// Recoverable problems found while reconciling. These never fail the edit;
/// the affected derived field is left unset and the raw input preserved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileWarning {
    #[error("points entry '{raw}' is not a number; P&L left unset")]
    UnparseablePoints { raw: String },
    #[error("instrument '{key}' is not in the catalog; risk/P&L left unset")]
    UnknownInstrument { key: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub record: TradeRecord,
    pub outcome: Outcome,
    pub points_event: Option<PointsEvent>,
    /// Whether the derived fields were recomputed or passed through.
    pub recalculated: bool,
    pub warnings: Vec<ReconcileWarning>,
}

/// Reconcile one record against its previously persisted version.
///
/// `previous` is `None` for a brand-new record, which always recomputes.
/// `now` is stamped as the exit time on a realization event; nothing else
/// reads the clock.
pub fn reconcile(
    current: &TradeRecord,
    previous: Option<&TradeRecord>,
    catalog: &InstrumentCatalog,
    now: NaiveDateTime,
) -> Reconciled {
    let mut record = current.clone();
    let mut warnings = Vec::new();

    // Points transition, on parsed values. A numeric entry corrupted into
    // text parses as absent and therefore un-realizes the trade.
    let prev_pts = safe_parse_float(previous.and_then(|p| p.points_realized.as_deref()));
    let curr_pts = safe_parse_float(record.points_realized.as_deref());
    let points_event = match (prev_pts, curr_pts) {
        (None, Some(_)) => Some(PointsEvent::Realized),
        (Some(_), None) => Some(PointsEvent::Unrealized),
        _ => None,
    };
    match points_event {
        Some(PointsEvent::Realized) => {
            // Set once per realization; later point edits keep the original.
            if record.exit_time.is_none() {
                record.exit_time = Some(now);
            }
        }
        Some(PointsEvent::Unrealized) => {
            record.realized_pnl = None;
            record.exit_time = None;
        }
        None => {}
    }

    // Recompute only when an input that feeds the formulas changed. The raw
    // points text is compared here, not its parse.
    let recalculated = match previous {
        None => true,
        Some(prev) => {
            record.instrument != prev.instrument
                || record.size != prev.size
                || record.stop_loss_points != prev.stop_loss_points
                || record.points_realized != prev.points_realized
                || record.status != prev.status
        }
    };

    let mut pnl_status = None;
    if recalculated {
        let mf = catalog.multiplier(&record.instrument);
        if mf.is_none() {
            warnings.push(ReconcileWarning::UnknownInstrument {
                key: record.instrument.clone(),
            });
        }

        record.risk_dollars = match (mf, record.stop_loss_points) {
            (Some(mf), Some(stop)) if record.size > 0.0 && stop > 0.0 => {
                Some(round2(record.size * stop * mf))
            }
            _ => None,
        };

        record.realized_pnl = match (mf, curr_pts) {
            (Some(mf), Some(points)) if record.size > 0.0 => {
                Some(round2(record.size * points * mf))
            }
            _ => None,
        };
        if curr_pts.is_none() {
            if let Some(raw) = &record.points_realized {
                warnings.push(ReconcileWarning::UnparseablePoints { raw: raw.clone() });
            }
        }

        // A conclusive P&L overrides whatever status the edit carried.
        if let Some(pnl) = record.realized_pnl {
            let s = TradeStatus::for_pnl(pnl);
            record.status = s;
            pnl_status = Some(s);
        }
    }

    if points_event == Some(PointsEvent::Unrealized) {
        record.status = TradeStatus::Active;
    }

    let outcome = if points_event == Some(PointsEvent::Unrealized) {
        Outcome::Loss
    } else {
        match pnl_status {
            Some(TradeStatus::Win) => Outcome::Win,
            Some(TradeStatus::Loss) | Some(TradeStatus::BreakEven) => Outcome::Loss,
            _ => Outcome::Neutral,
        }
    };

    Reconciled {
        record,
        outcome,
        points_event,
        recalculated,
        warnings,
    }
}
