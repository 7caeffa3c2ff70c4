//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, FixedOffset, Utc};

use scrapeboard::dashboard::DashboardOptions;
use scrapeboard::firestore::{DocumentSnapshot, Fields, MemoryStore, Value};
use scrapeboard::queries::{MODELS_COLLECTION, SCRAPE_LOGS_COLLECTION};
use scrapeboard::render::{DateFormatter, ViewerZone};

/// Scrape log document with the fields the scrapers write.
pub fn log_doc(
    id: &str,
    seconds: i64,
    board: Option<&str>,
    added: Option<i64>,
    removed: Option<i64>,
) -> DocumentSnapshot {
    let ts = DateTime::<Utc>::from_timestamp(seconds, 0).unwrap();
    let mut fields = Fields::new();
    fields.insert("timestamp".to_string(), Value::Timestamp(ts.to_rfc3339()));
    if let Some(board) = board {
        fields.insert("board".to_string(), Value::String(board.to_string()));
    }
    if let Some(added) = added {
        fields.insert("added".to_string(), Value::Integer(added.to_string()));
    }
    if let Some(removed) = removed {
        fields.insert("removed".to_string(), Value::Integer(removed.to_string()));
    }
    DocumentSnapshot::new(
        format!("projects/test/databases/(default)/documents/scrape_logs/{}", id),
        fields,
    )
}

/// Store holding the two-record scenario (inserted oldest first) and `models` documents.
pub fn scenario_store(models: usize) -> MemoryStore {
    let store = MemoryStore::new();
    store.insert(
        SCRAPE_LOGS_COLLECTION,
        log_doc("first", 1_700_000_000, Some("A"), Some(5), Some(2)),
    );
    store.insert(
        SCRAPE_LOGS_COLLECTION,
        log_doc("second", 1_700_003_600, Some("B"), Some(0), None),
    );
    for i in 0..models {
        store.insert(
            MODELS_COLLECTION,
            DocumentSnapshot::new(format!("models/model_{}", i), Fields::new()),
        );
    }
    store
}

/// Options rendering dates in UTC so output is deterministic.
pub fn utc_options() -> DashboardOptions {
    DashboardOptions {
        formatter: DateFormatter::new(
            "%Y-%m-%d %H:%M:%S",
            ViewerZone::Fixed(FixedOffset::east_opt(0).unwrap()),
        )
        .unwrap(),
        title: "Scrape Dashboard".to_string(),
        ..Default::default()
    }
}
