pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod report;
pub mod runner;
pub mod seed;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Config;
pub use db::Database;
pub use errors::BookstoreError;
