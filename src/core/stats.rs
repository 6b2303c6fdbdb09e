//! Journal-wide statistics: KPI roll-up, cumulative P&L curve, per-day
//! summaries, and per-tag breakdowns. Everything here is derived on read
//! from the full record list.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, NaiveDateTime};

use crate::core::parse::round2;
use crate::models::TradeRecord;

/// Classification dimensions the breakdown reports on.
pub const DIMENSIONS: [&str; 8] = [
    "score",
    "entry_quality",
    "emotional_state",
    "sizing",
    "came_to_me",
    "with_value",
    "market_conditions",
    "instrument",
];

#[derive(Debug, Clone, PartialEq)]
pub struct JournalStats {
    pub total_trades: usize,
    pub closed_trades: usize,
    pub wins: usize,
    /// Closed trades with P&L <= 0; break-even counts as a loss.
    pub losses: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub best_trade: Option<f64>,
    pub worst_trade: Option<f64>,
    pub avg_trades_per_day: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub pnl: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagStats {
    pub label: String,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub avg_pnl: f64,
}

pub fn compute_stats(records: &[TradeRecord]) -> JournalStats {
    let total_trades = records.len();
    let mut closed_trades = 0;
    let mut wins = 0;
    let mut win_sum = 0.0;
    let mut loss_sum = 0.0;
    let mut total_pnl = 0.0;
    let mut best_trade: Option<f64> = None;
    let mut worst_trade: Option<f64> = None;

    for r in records.iter().filter(|r| r.status.is_closed()) {
        closed_trades += 1;
        let pnl = r.realized_pnl.unwrap_or(0.0);
        total_pnl += pnl;
        if pnl > 0.0 {
            wins += 1;
            win_sum += pnl;
        } else {
            loss_sum += pnl;
        }
        best_trade = Some(best_trade.map_or(pnl, |b| b.max(pnl)));
        worst_trade = Some(worst_trade.map_or(pnl, |w| w.min(pnl)));
    }

    let losses = closed_trades - wins;
    let win_rate = if closed_trades > 0 {
        round2(wins as f64 / closed_trades as f64 * 100.0)
    } else {
        0.0
    };
    let avg_win = if wins > 0 {
        round2(win_sum / wins as f64)
    } else {
        0.0
    };
    let avg_loss = if losses > 0 {
        round2(loss_sum / losses as f64)
    } else {
        0.0
    };
    let days = records
        .iter()
        .map(|r| r.entry_date())
        .collect::<std::collections::HashSet<_>>()
        .len();
    let avg_trades_per_day = if days > 0 {
        round2(total_trades as f64 / days as f64)
    } else {
        0.0
    };

    JournalStats {
        total_trades,
        closed_trades,
        wins,
        losses,
        win_rate,
        total_pnl: round2(total_pnl),
        avg_win,
        avg_loss,
        best_trade,
        worst_trade,
        avg_trades_per_day,
    }
}

/// Running realized P&L in entry-time order. Open trades contribute a flat
/// step so the curve covers every entry.
pub fn cumulative_pnl(records: &[TradeRecord]) -> Vec<(NaiveDateTime, f64)> {
    let mut ordered: Vec<&TradeRecord> = records.iter().collect();
    ordered.sort_by_key(|r| r.entry_time);
    let mut running = 0.0;
    ordered
        .into_iter()
        .map(|r| {
            if r.status.is_closed() {
                running += r.realized_pnl.unwrap_or(0.0);
            }
            (r.entry_time, round2(running))
        })
        .collect()
}

pub fn daily_summaries(records: &[TradeRecord]) -> Vec<DaySummary> {
    let mut days: BTreeMap<NaiveDate, DaySummary> = BTreeMap::new();
    for r in records {
        let entry = days.entry(r.entry_date()).or_insert_with(|| DaySummary {
            date: r.entry_date(),
            trades: 0,
            wins: 0,
            losses: 0,
            pnl: 0.0,
        });
        entry.trades += 1;
        if r.status.is_closed() {
            let pnl = r.realized_pnl.unwrap_or(0.0);
            entry.pnl += pnl;
            if pnl > 0.0 {
                entry.wins += 1;
            } else {
                entry.losses += 1;
            }
        }
    }
    days.into_values()
        .map(|mut d| {
            d.pnl = round2(d.pnl);
            d
        })
        .collect()
}

/// Closed-trade breakdown for one classification dimension. Untagged rows
/// are skipped; buckets come back sorted by total P&L, best first.
pub fn dimension_breakdown(records: &[TradeRecord], dimension: &str) -> Vec<TagStats> {
    let mut buckets: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for r in records.iter().filter(|r| r.status.is_closed()) {
        if let Some(label) = tag_label(r, dimension) {
            buckets
                .entry(label)
                .or_default()
                .push(r.realized_pnl.unwrap_or(0.0));
        }
    }

    let mut out: Vec<TagStats> = buckets
        .into_iter()
        .map(|(label, pnls)| {
            let trades = pnls.len();
            let wins = pnls.iter().filter(|p| **p > 0.0).count();
            let total: f64 = pnls.iter().sum();
            TagStats {
                label,
                trades,
                wins,
                losses: trades - wins,
                win_rate: round2(wins as f64 / trades as f64 * 100.0),
                total_pnl: round2(total),
                avg_pnl: round2(total / trades as f64),
            }
        })
        .collect();
    out.sort_by(|a, b| {
        b.total_pnl
            .partial_cmp(&a.total_pnl)
            .unwrap_or(Ordering::Equal)
    });
    out
}

pub fn tag_breakdown(records: &[TradeRecord]) -> HashMap<String, Vec<TagStats>> {
    DIMENSIONS
        .iter()
        .map(|dim| (dim.to_string(), dimension_breakdown(records, dim)))
        .collect()
}

fn tag_label(r: &TradeRecord, dimension: &str) -> Option<String> {
    match dimension {
        "score" => r.score.map(|v| v.as_str().to_string()),
        "entry_quality" => r.entry_quality.map(|v| v.as_str().to_string()),
        "emotional_state" => r.emotional_state.map(|v| v.as_str().to_string()),
        "sizing" => Some(r.sizing.as_str().to_string()),
        "came_to_me" => r.came_to_me.map(|v| v.as_str().to_string()),
        "with_value" => r.with_value.map(|v| v.as_str().to_string()),
        "market_conditions" => r.market_conditions.map(|v| v.as_str().to_string()),
        "instrument" => Some(r.instrument.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::parse_ts;
    use crate::models::{Score, TradeStatus};

    fn trade(entry: &str, status: TradeStatus, pnl: Option<f64>) -> TradeRecord {
        let mut r = TradeRecord::new(1, "MES", 5.0, parse_ts(entry).unwrap());
        r.status = status;
        r.realized_pnl = pnl;
        r
    }

    #[test]
    fn win_rate_counts_breakeven_as_loss() {
        let records = vec![
            trade("2024-05-01 09:30:00", TradeStatus::Win, Some(250.0)),
            trade("2024-05-01 10:30:00", TradeStatus::BreakEven, Some(0.0)),
            trade("2024-05-01 11:30:00", TradeStatus::Active, None),
        ];
        let stats = compute_stats(&records);
        assert_eq!(stats.total_trades, 3);
        assert_eq!(stats.closed_trades, 2);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.win_rate, 50.0);
        assert_eq!(stats.total_pnl, 250.0);
        assert_eq!(stats.best_trade, Some(250.0));
        assert_eq!(stats.worst_trade, Some(0.0));
    }

    #[test]
    fn avg_trades_per_day_uses_distinct_dates() {
        let records = vec![
            trade("2024-05-01 09:30:00", TradeStatus::Active, None),
            trade("2024-05-01 10:30:00", TradeStatus::Active, None),
            trade("2024-05-02 09:30:00", TradeStatus::Active, None),
        ];
        let stats = compute_stats(&records);
        assert_eq!(stats.avg_trades_per_day, 1.5);
    }

    #[test]
    fn cumulative_curve_runs_in_entry_order() {
        let records = vec![
            trade("2024-05-01 11:00:00", TradeStatus::Loss, Some(-100.0)),
            trade("2024-05-01 09:30:00", TradeStatus::Win, Some(250.0)),
            trade("2024-05-01 10:00:00", TradeStatus::Active, None),
        ];
        let curve = cumulative_pnl(&records);
        let values: Vec<f64> = curve.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![250.0, 250.0, 150.0]);
    }

    #[test]
    fn daily_summaries_ascend_by_date() {
        let records = vec![
            trade("2024-05-02 09:30:00", TradeStatus::Win, Some(100.0)),
            trade("2024-05-01 09:30:00", TradeStatus::Loss, Some(-50.0)),
            trade("2024-05-01 10:30:00", TradeStatus::Win, Some(75.0)),
        ];
        let days = daily_summaries(&records);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, parse_ts("2024-05-01 00:00:00").unwrap().date());
        assert_eq!(days[0].trades, 2);
        assert_eq!(days[0].wins, 1);
        assert_eq!(days[0].losses, 1);
        assert_eq!(days[0].pnl, 25.0);
        assert_eq!(days[1].pnl, 100.0);
    }

    #[test]
    fn breakdown_skips_untagged_and_sorts_by_pnl() {
        let mut a = trade("2024-05-01 09:30:00", TradeStatus::Win, Some(250.0));
        a.score = Some(Score::APlus);
        let mut b = trade("2024-05-01 10:30:00", TradeStatus::Loss, Some(-100.0));
        b.score = Some(Score::C);
        let untagged = trade("2024-05-01 11:30:00", TradeStatus::Win, Some(500.0));

        let buckets = dimension_breakdown(&[a, b, untagged], "score");
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label, "A+");
        assert_eq!(buckets[0].total_pnl, 250.0);
        assert_eq!(buckets[0].win_rate, 100.0);
        assert_eq!(buckets[1].label, "C");
        assert_eq!(buckets[1].avg_pnl, -100.0);
    }

    #[test]
    fn breakdown_covers_every_dimension() {
        let records = vec![trade("2024-05-01 09:30:00", TradeStatus::Win, Some(250.0))];
        let all = tag_breakdown(&records);
        assert_eq!(all.len(), DIMENSIONS.len());
        // sizing and instrument are always present on a record
        assert_eq!(all["sizing"].len(), 1);
        assert_eq!(all["instrument"][0].label, "MES");
        assert!(all["score"].is_empty());
    }
}
