pub mod archive;
pub mod daybook;

pub use daybook::{BatchSummary, Daybook, EditSummary, TradeDraft};
