pub mod clock;
pub mod config;
pub mod core;
pub mod error;
pub mod journal;
pub mod models;
pub mod report;
pub mod store;
#[cfg(test)]
pub mod test_helpers;
