use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Wall-clock format used everywhere a timestamp is stored or displayed.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_ts(t: NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_ts(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok()
}

/// Wall clock pinned to the journal's timezone.
#[derive(Debug, Clone)]
pub struct JournalClock {
    tz: Tz,
    /// When set, used instead of the system clock (tests).
    fixed: Option<NaiveDateTime>,
}

impl JournalClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz, fixed: None }
    }

    pub fn fixed(at: NaiveDateTime) -> Self {
        Self {
            tz: chrono_tz::UTC,
            fixed: Some(at),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        match self.fixed {
            Some(t) => t,
            None => Utc::now().with_timezone(&self.tz).naive_local(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_round_trip() {
        let t = parse_ts("2024-05-01 09:30:41").unwrap();
        assert_eq!(format_ts(t), "2024-05-01 09:30:41");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_ts("yesterday").is_none());
        assert!(parse_ts("").is_none());
    }

    #[test]
    fn fixed_clock_is_stable() {
        let at = parse_ts("2024-05-01 09:30:00").unwrap();
        let clock = JournalClock::fixed(at);
        assert_eq!(clock.now(), at);
        assert_eq!(clock.today(), at.date());
    }
}
