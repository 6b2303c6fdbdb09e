//! Day-level risk aggregation, re-derived on every read.

use crate::core::parse::round2;
use crate::models::TradeRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayExposure {
    pub daily_risk_limit: f64,
    /// Risk committed to still-open trades.
    pub active_risk: f64,
    /// Booked P&L of closed trades.
    pub realized_pnl: f64,
    /// Room left under the limit, floored at zero.
    pub available_risk: f64,
}

pub fn compute_exposure(records: &[TradeRecord], daily_risk_limit: f64) -> DayExposure {
    let mut active_risk = 0.0;
    let mut realized_pnl = 0.0;
    for r in records {
        if r.status.is_closed() {
            realized_pnl += r.realized_pnl.unwrap_or(0.0);
        } else {
            active_risk += r.risk_dollars.unwrap_or(0.0);
        }
    }
    let available_risk = (daily_risk_limit + realized_pnl - active_risk).max(0.0);
    DayExposure {
        daily_risk_limit,
        active_risk: round2(active_risk),
        realized_pnl: round2(realized_pnl),
        available_risk: round2(available_risk),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::parse_ts;
    use crate::models::TradeStatus;

    fn trade(status: TradeStatus, risk: Option<f64>, pnl: Option<f64>) -> TradeRecord {
        let mut r = TradeRecord::new(1, "MES", 5.0, parse_ts("2024-05-01 09:30:00").unwrap());
        r.status = status;
        r.risk_dollars = risk;
        r.realized_pnl = pnl;
        r
    }

    #[test]
    fn splits_active_risk_from_realized_pnl() {
        let records = vec![
            trade(TradeStatus::Active, Some(550.0), None),
            trade(TradeStatus::Active, None, None),
            trade(TradeStatus::Win, Some(110.0), Some(250.0)),
            trade(TradeStatus::Loss, Some(110.0), Some(-100.0)),
        ];
        let exp = compute_exposure(&records, 550.0);
        assert_eq!(exp.active_risk, 550.0);
        assert_eq!(exp.realized_pnl, 150.0);
        assert_eq!(exp.available_risk, 150.0);
    }

    #[test]
    fn available_risk_floors_at_zero() {
        let records = vec![
            trade(TradeStatus::Active, Some(550.0), None),
            trade(TradeStatus::Loss, None, Some(-300.0)),
        ];
        let exp = compute_exposure(&records, 550.0);
        assert_eq!(exp.available_risk, 0.0);
    }

    #[test]
    fn empty_day_has_full_limit() {
        let exp = compute_exposure(&[], 550.0);
        assert_eq!(exp.active_risk, 0.0);
        assert_eq!(exp.realized_pnl, 0.0);
        assert_eq!(exp.available_risk, 550.0);
    }
}
