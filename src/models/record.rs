use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::status::{
    Confirmation, EmotionalState, EntryQuality, MarketConditions, Score, Sizing, TradeStatus,
};

/// One row of the journal.
///
/// `risk_dollars`, `realized_pnl`, `status` (once P&L is conclusive) and
/// `exit_time` are derived by the reconciler; everything else is user input.
/// `points_realized` keeps the entry exactly as typed so an unparseable
/// value can be shown back instead of silently dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub trade_num: u32,
    pub instrument: String,
    pub size: f64,
    #[serde(default)]
    pub stop_loss_points: Option<f64>,
    #[serde(default)]
    pub risk_dollars: Option<f64>,
    #[serde(default)]
    pub status: TradeStatus,
    #[serde(default, deserialize_with = "de_points")]
    pub points_realized: Option<String>,
    #[serde(default)]
    pub realized_pnl: Option<f64>,
    #[serde(with = "ts")]
    pub entry_time: NaiveDateTime,
    #[serde(default, with = "ts_opt")]
    pub exit_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub came_to_me: Option<Confirmation>,
    #[serde(default)]
    pub with_value: Option<Confirmation>,
    #[serde(default)]
    pub market_conditions: Option<MarketConditions>,
    #[serde(default)]
    pub score: Option<Score>,
    #[serde(default)]
    pub entry_quality: Option<EntryQuality>,
    #[serde(default)]
    pub emotional_state: Option<EmotionalState>,
    #[serde(default)]
    pub sizing: Sizing,
    #[serde(default)]
    pub notes: String,
}

impl TradeRecord {
    pub fn new(
        trade_num: u32,
        instrument: impl Into<String>,
        size: f64,
        entry_time: NaiveDateTime,
    ) -> Self {
        Self {
            id: None,
            trade_num,
            instrument: instrument.into(),
            size,
            stop_loss_points: None,
            risk_dollars: None,
            status: TradeStatus::Active,
            points_realized: None,
            realized_pnl: None,
            entry_time,
            exit_time: None,
            came_to_me: None,
            with_value: None,
            market_conditions: None,
            score: None,
            entry_quality: None,
            emotional_state: None,
            sizing: Sizing::Base,
            notes: String::new(),
        }
    }

    pub fn entry_date(&self) -> NaiveDate {
        self.entry_time.date()
    }

    /// Store the raw points entry; whitespace-only input counts as blank.
    pub fn set_points(&mut self, raw: Option<&str>) {
        self.points_realized = normalize_points(raw);
    }
}

fn normalize_points(raw: Option<&str>) -> Option<String> {
    let s = raw?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Accepts a JSON string, number, or null for the points entry. Numbers are
/// kept as their text form; blank strings collapse to none.
fn de_points<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let v = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match v {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => normalize_points(Some(&s)),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(other) => normalize_points(Some(&other.to_string())),
    })
}

fn parse_flexible(s: &str) -> Option<NaiveDateTime> {
    crate::clock::parse_ts(s).or_else(|| s.trim().parse().ok())
}

mod ts {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::clock::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(t: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(d)?;
        super::parse_flexible(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("bad timestamp '{s}'")))
    }
}

mod ts_opt {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::clock::TIMESTAMP_FORMAT;

    pub fn serialize<S: Serializer>(
        t: &Option<NaiveDateTime>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        match t {
            Some(t) => s.serialize_str(&t.format(TIMESTAMP_FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let s = Option::<String>::deserialize(d)?;
        match s {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => super::parse_flexible(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("bad timestamp '{s}'"))),
        }
    }
}
