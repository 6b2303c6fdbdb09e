use trade_journal::clock::{parse_ts, JournalClock};
use trade_journal::config::Config;
use trade_journal::journal::Daybook;
use trade_journal::store::TradeStore;

/// Config wired for tests: the stock MES/ES catalog, in-memory database.
pub fn test_config() -> Config {
    let mut cfg = Config::default();
    cfg.database_path = ":memory:".to_string();
    cfg
}

/// A Daybook over a fresh in-memory store with the clock pinned.
pub fn test_book(at: &str) -> Daybook {
    let store = TradeStore::open_in_memory().unwrap();
    let clock = JournalClock::fixed(parse_ts(at).unwrap());
    Daybook::with_store(test_config(), store, clock).unwrap()
}
