use crate::config::{Config, InstrumentCatalog};

/// A Config suitable for testing: the stock MES/ES setup with an in-memory
/// database path.
pub fn default_test_config() -> Config {
    let mut cfg = Config::default();
    cfg.database_path = ":memory:".to_string();
    cfg
}

/// Catalog with the two contracts the tests trade (ES at 50, MES at 5).
pub fn test_catalog() -> InstrumentCatalog {
    default_test_config().instruments
}
