//! scrapeboard - read-only dashboard for agency scrape logs.
//!
//! Reads the `scrape_logs` and `models` collections of a Firestore database
//! and renders them as an HTML page: a list and a table of scrape runs,
//! newest first, plus the total model count.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod firestore;
pub mod models;
pub mod queries;
pub mod render;
pub mod server;

pub use error::{ConfigError, QueryError};
