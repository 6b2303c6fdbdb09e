mod common;

use common::test_book;

use trade_journal::clock::parse_ts;
use trade_journal::core::stats;
use trade_journal::journal::TradeDraft;
use trade_journal::models::{Outcome, TradeRecord, TradeStatus};

#[test]
fn full_day_lifecycle() {
    let mut book = test_book("2024-05-01 09:30:00");

    // 1. New trade from config defaults: MES, 5 contracts, stop sized so the
    //    full daily budget is at risk.
    let trade = book.add_trade(TradeDraft::default()).unwrap();
    assert_eq!(trade.trade_num, 1);
    assert_eq!(trade.instrument, "MES");
    assert_eq!(trade.size, 5.0);
    assert_eq!(trade.stop_loss_points, Some(22.0));
    assert_eq!(trade.risk_dollars, Some(550.0));
    assert_eq!(trade.status, TradeStatus::Active);
    let id = trade.id.unwrap();

    let exposure = book.exposure(book.today()).unwrap();
    assert_eq!(exposure.active_risk, 550.0);
    assert_eq!(exposure.available_risk, 0.0);

    // 2. Close for 10 points: P&L books, status flips, exit time stamps,
    //    the pressing streak advances.
    let closed = book.close_trade(id, "10").unwrap();
    assert_eq!(closed.record.realized_pnl, Some(250.0));
    assert_eq!(closed.record.status, TradeStatus::Win);
    assert_eq!(
        closed.record.exit_time,
        Some(parse_ts("2024-05-01 09:30:00").unwrap())
    );
    assert_eq!(closed.outcome, Outcome::Win);
    assert_eq!(book.pressing().index, 1);
    assert_eq!(book.suggested_size(), 10.0);

    let exposure = book.exposure(book.today()).unwrap();
    assert_eq!(exposure.active_risk, 0.0);
    assert_eq!(exposure.realized_pnl, 250.0);
    assert_eq!(exposure.available_risk, 800.0);

    // 3. Clear the points: everything derived unwinds and the streak resets.
    let reopened = book.reopen_trade(id).unwrap();
    assert_eq!(reopened.record.status, TradeStatus::Active);
    assert_eq!(reopened.record.realized_pnl, None);
    assert_eq!(reopened.record.exit_time, None);
    assert_eq!(reopened.outcome, Outcome::Loss);
    assert_eq!(book.pressing().index, 0);
    assert_eq!(book.suggested_size(), 5.0);
}

#[test]
fn pressing_walks_the_roadmap_and_wraps() {
    let mut book = test_book("2024-05-01 09:30:00");
    let mut indices = vec![book.pressing().index];

    for _ in 0..4 {
        let trade = book.add_trade(TradeDraft::default()).unwrap();
        book.close_trade(trade.id.unwrap(), "4").unwrap();
        indices.push(book.pressing().index);
    }

    assert_eq!(indices, vec![0, 1, 2, 3, 0]);
}

#[test]
fn garbage_points_leave_the_trade_open() {
    let mut book = test_book("2024-05-01 09:30:00");
    let trade = book.add_trade(TradeDraft::default()).unwrap();
    let id = trade.id.unwrap();

    let fumbled = book.close_trade(id, "ten points").unwrap();
    assert_eq!(fumbled.record.status, TradeStatus::Active);
    assert_eq!(fumbled.record.realized_pnl, None);
    assert_eq!(fumbled.record.points_realized.as_deref(), Some("ten points"));
    assert!(!fumbled.warnings.is_empty());
    assert_eq!(book.pressing().index, 0);

    // the raw entry survives in the store for redisplay
    let stored = book.get(id).unwrap();
    assert_eq!(stored.points_realized.as_deref(), Some("ten points"));

    let fixed = book.close_trade(id, "7.5").unwrap();
    assert_eq!(fixed.record.realized_pnl, Some(187.5));
    assert_eq!(fixed.record.status, TradeStatus::Win);
    assert_eq!(book.pressing().index, 1);
}

#[test]
fn batch_deletion_outweighs_a_win() {
    let mut book = test_book("2024-05-01 09:30:00");
    let winner = book.add_trade(TradeDraft::default()).unwrap();
    let doomed = book.add_trade(TradeDraft::default()).unwrap();

    let mut close = winner.clone();
    close.set_points(Some("10"));
    // a brand-new row arriving already closed rides along in the same batch
    let mut newcomer = TradeRecord::new(3, "MES", 5.0, parse_ts("2024-05-01 10:00:00").unwrap());
    newcomer.set_points(Some("2"));

    let summary = book
        .apply_batch(vec![close, newcomer], &[doomed.id.unwrap()])
        .unwrap();
    assert_eq!(summary.records.len(), 2);
    assert_eq!(summary.records[0].status, TradeStatus::Win);
    assert_eq!(summary.records[1].status, TradeStatus::Win);
    assert_eq!(summary.deleted, 1);
    assert_eq!(summary.outcome, Outcome::Loss);
    assert_eq!(book.pressing().index, 0);
    assert_eq!(book.all_records().unwrap().len(), 2);
}

#[test]
fn stats_roll_up_across_days() {
    let mut book = test_book("2024-05-01 09:30:00");

    let mut day_one_win = TradeRecord::new(1, "MES", 5.0, parse_ts("2024-05-01 09:30:00").unwrap());
    day_one_win.set_points(Some("10"));
    let mut day_one_flat = TradeRecord::new(2, "MES", 5.0, parse_ts("2024-05-01 11:00:00").unwrap());
    day_one_flat.set_points(Some("0"));
    let mut day_two_loss = TradeRecord::new(1, "ES", 1.0, parse_ts("2024-05-02 09:30:00").unwrap());
    day_two_loss.set_points(Some("-3"));

    book.apply_batch(vec![day_one_win, day_one_flat, day_two_loss], &[])
        .unwrap();

    let records = book.all_records().unwrap();
    let overall = stats::compute_stats(&records);
    assert_eq!(overall.total_trades, 3);
    assert_eq!(overall.closed_trades, 3);
    assert_eq!(overall.wins, 1);
    // break-even counts as a loss
    assert_eq!(overall.losses, 2);
    assert_eq!(overall.total_pnl, 100.0);
    assert_eq!(overall.avg_trades_per_day, 1.5);

    let days = stats::daily_summaries(&records);
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].pnl, 250.0);
    assert_eq!(days[1].pnl, -150.0);

    let curve = stats::cumulative_pnl(&records);
    let values: Vec<f64> = curve.iter().map(|(_, v)| *v).collect();
    assert_eq!(values, vec![250.0, 250.0, 100.0]);
}
