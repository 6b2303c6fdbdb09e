pub mod exposure;
pub mod parse;
pub mod pressing;
pub mod reconcile;
pub mod stats;
