use thiserror::Error;

pub type Result<T> = std::result::Result<T, JournalError>;

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("config: {0}")]
    Config(String),

    #[error("store: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("no trade with id {0}")]
    UnknownTrade(i64),

    #[error("unsaved record has no id")]
    MissingId,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
}
