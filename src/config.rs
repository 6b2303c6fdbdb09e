use std::collections::BTreeMap;
use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{JournalError, Result};

/// Dollar value of one point for one contract ("multiplier factor").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSpec {
    pub mf: f64,
}

/// Instrument key -> spec. Read-only to the core; the reconciler refuses to
/// derive risk or P&L for a key that is not in here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentCatalog(pub BTreeMap<String, InstrumentSpec>);

impl InstrumentCatalog {
    pub fn lookup(&self, key: &str) -> Option<&InstrumentSpec> {
        self.0.get(key)
    }

    pub fn multiplier(&self, key: &str) -> Option<f64> {
        self.0.get(key).map(|s| s.mf)
    }

    pub fn insert(&mut self, key: impl Into<String>, mf: f64) {
        self.0.insert(key.into(), InstrumentSpec { mf });
    }
}

/// Journal configuration, loaded from a JSON file. Missing fields fall back
/// to the defaults below; a missing or malformed file is fatal at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Risk
    pub daily_risk: f64,
    pub profit_target: f64,
    pub max_trades_per_day: u32,

    // Defaults for new trades
    pub default_instrument: String,
    pub default_size: f64,

    // Instruments ("futures_types" in older config files)
    #[serde(alias = "futures_types")]
    pub instruments: InstrumentCatalog,

    // Pressing roadmap
    pub pressing_multipliers: Vec<f64>,

    // Storage
    pub database_path: String,
    pub timezone: String,
}

impl Default for Config {
    fn default() -> Self {
        let mut instruments = InstrumentCatalog::default();
        instruments.insert("ES", 50.0);
        instruments.insert("MES", 5.0);
        Config {
            daily_risk: 550.0,
            profit_target: 600.0,
            max_trades_per_day: 6,
            default_instrument: "MES".to_string(),
            default_size: 5.0,
            instruments,
            pressing_multipliers: vec![1.0, 2.0, 1.5, 3.0],
            database_path: "trades.db".to_string(),
            timezone: "America/New_York".to_string(),
        }
    }
}

impl Config {
    /// Load and validate. `JOURNAL_DB` overrides the database path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            JournalError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut cfg: Config = serde_json::from_str(&raw).map_err(|e| {
            JournalError::Config(format!("malformed {}: {e}", path.display()))
        })?;
        if let Ok(db) = std::env::var("JOURNAL_DB") {
            if !db.trim().is_empty() {
                cfg.database_path = db;
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pressing_multipliers.is_empty() {
            return Err(JournalError::Config(
                "pressing_multipliers must not be empty".to_string(),
            ));
        }
        if self.daily_risk <= 0.0 {
            return Err(JournalError::Config("daily_risk must be positive".to_string()));
        }
        if self.default_size <= 0.0 {
            return Err(JournalError::Config("default_size must be positive".to_string()));
        }
        if self.instruments.lookup(&self.default_instrument).is_none() {
            return Err(JournalError::Config(format!(
                "default_instrument '{}' is not in the instrument catalog",
                self.default_instrument
            )));
        }
        self.tz()?;
        Ok(())
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| JournalError::Config(format!("unknown timezone '{}'", self.timezone)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_and_carry_both_contracts() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.instruments.multiplier("ES"), Some(50.0));
        assert_eq!(cfg.instruments.multiplier("MES"), Some(5.0));
        assert_eq!(cfg.instruments.multiplier("NQ"), None);
    }

    #[test]
    fn sparse_file_fills_from_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"daily_risk": 1000}"#).unwrap();
        assert_eq!(cfg.daily_risk, 1000.0);
        assert_eq!(cfg.default_instrument, "MES");
        assert_eq!(cfg.pressing_multipliers, vec![1.0, 2.0, 1.5, 3.0]);
    }

    #[test]
    fn legacy_futures_types_key_is_accepted() {
        let cfg: Config =
            serde_json::from_str(r#"{"futures_types": {"NQ": {"mf": 20}}}"#).unwrap();
        assert_eq!(cfg.instruments.multiplier("NQ"), Some(20.0));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut cfg = Config::default();
        cfg.pressing_multipliers.clear();
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.default_instrument = "GC".to_string();
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.timezone = "Mars/Olympus".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_reports_the_offending_path() {
        let err = Config::load("/definitely/not/here/config.json").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/definitely/not/here/config.json"), "{msg}");
    }
}
