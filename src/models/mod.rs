pub mod record;
pub mod status;

pub use record::TradeRecord;
pub use status::*;
