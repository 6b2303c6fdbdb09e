//! Plain-text reports for the CLI, one section per concern.

use chrono::NaiveDate;

use crate::clock::DATE_FORMAT;
use crate::config::Config;
use crate::core::exposure::DayExposure;
use crate::core::pressing::RoadmapStep;
use crate::core::stats::{DaySummary, JournalStats, TagStats};
use crate::models::TradeRecord;

pub fn print_day_report(
    date: NaiveDate,
    records: &[TradeRecord],
    exposure: &DayExposure,
    cfg: &Config,
    roadmap: &[RoadmapStep],
) {
    println!("\n{}", "=".repeat(70));
    println!("  DAY REPORT  {}", date.format(DATE_FORMAT));
    println!("{}", "=".repeat(70));

    if records.is_empty() {
        println!("  (no trades)");
    } else {
        for r in records {
            print_trade_line(r);
        }
    }

    println!();
    println!("  EXPOSURE");
    println!("  ───────────────────────────────────");
    println!("  Limit:       ${:.2}", exposure.daily_risk_limit);
    println!("  Active Risk: ${:.2}", exposure.active_risk);
    println!("  Realized:    ${:+.2}", exposure.realized_pnl);
    println!("  Available:   ${:.2}", exposure.available_risk);
    println!(
        "  Target:      ${:+.2} of ${:.2}",
        exposure.realized_pnl, cfg.profit_target
    );

    println!();
    println!("  PRESSING");
    println!("  ───────────────────────────────────");
    for step in roadmap {
        let marker = if step.current { "->" } else { "  " };
        println!(
            "  {} step {}: x{} ({} contracts)",
            marker,
            step.index + 1,
            step.multiplier,
            step.contracts
        );
    }
}

pub fn print_trade_line(r: &TradeRecord) {
    let stop = r
        .stop_loss_points
        .map(|v| format!("{v}"))
        .unwrap_or_else(|| "-".to_string());
    let risk = r
        .risk_dollars
        .map(|v| format!("${v:.2}"))
        .unwrap_or_else(|| "-".to_string());
    let pnl = r
        .realized_pnl
        .map(|v| format!("${v:+.2}"))
        .unwrap_or_else(|| "-".to_string());
    let pts = r.points_realized.as_deref().unwrap_or("-");
    let id = r.id.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string());

    println!(
        "  #{:<3} [id {:>3}] {:<4} {:>4} x {:>6} | risk {:>9} | {:<6} | pts {:>8} | P&L {:>10}",
        r.trade_num,
        id,
        r.instrument,
        r.size,
        stop,
        risk,
        r.status.as_str(),
        pts,
        pnl
    );
    if !r.notes.is_empty() {
        println!("       note: {}", r.notes);
    }
}

pub fn print_stats_report(stats: &JournalStats, days: &[DaySummary]) {
    println!("\n{}", "=".repeat(70));
    println!("  JOURNAL STATS");
    println!("{}", "=".repeat(70));
    println!("  OVERALL");
    println!("  ───────────────────────────────────");
    println!(
        "  Trades:      {} ({} closed)",
        stats.total_trades, stats.closed_trades
    );
    println!("  Win/Loss:    {} / {}", stats.wins, stats.losses);
    println!("  Win Rate:    {:.1}%", stats.win_rate);
    println!("  Total P&L:   ${:+.2}", stats.total_pnl);
    println!("  Avg Win:     ${:+.2}", stats.avg_win);
    println!("  Avg Loss:    ${:+.2}", stats.avg_loss);
    match (stats.best_trade, stats.worst_trade) {
        (Some(best), Some(worst)) => {
            println!("  Best:        ${best:+.2}");
            println!("  Worst:       ${worst:+.2}");
        }
        _ => println!("  Best/Worst:  -"),
    }
    println!("  Per Day:     {:.1} trades", stats.avg_trades_per_day);

    if !days.is_empty() {
        println!();
        println!("  BY DAY");
        println!("  ───────────────────────────────────");
        for d in days {
            println!(
                "  {}: {} trades | {}W {}L | P&L ${:+.2}",
                d.date.format(DATE_FORMAT),
                d.trades,
                d.wins,
                d.losses,
                d.pnl
            );
        }
    }
}

pub fn print_breakdown(dimension: &str, buckets: &[TagStats]) {
    println!("\n{}", "=".repeat(70));
    println!("  BY {}", dimension.to_uppercase());
    println!("{}", "=".repeat(70));
    if buckets.is_empty() {
        println!("  (no closed trades tagged)");
        return;
    }
    for b in buckets {
        println!(
            "  {:>26}: {} trades | WR {:.0}% | PnL ${:+.2} | Avg ${:+.2}",
            b.label, b.trades, b.win_rate, b.total_pnl, b.avg_pnl
        );
    }
}

pub fn print_roadmap(steps: &[RoadmapStep], suggested: f64) {
    println!("\n{}", "=".repeat(70));
    println!("  PRESSING ROADMAP");
    println!("{}", "=".repeat(70));
    for step in steps {
        let marker = if step.current { "->" } else { "  " };
        println!(
            "  {} step {}: x{} ({} contracts)",
            marker,
            step.index + 1,
            step.multiplier,
            step.contracts
        );
    }
    println!();
    println!("  Suggested size for the next trade: {suggested} contracts");
}
