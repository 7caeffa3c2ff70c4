//! Records read from the database.

use serde::Serialize;
use tracing::warn;

use crate::error::QueryError;
use crate::firestore::DocumentSnapshot;

/// Point in time as stored by Firestore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl Timestamp {
    pub fn from_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }
}

/// One run of a scraper, as written to the `scrape_logs` collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeLogEntry {
    /// Document id.
    pub id: String,
    /// None when the stored field is not a timestamp value.
    pub timestamp: Option<Timestamp>,
    /// Source board that was scraped (e.g. "mainboard").
    pub board: Option<String>,
    pub added: Option<i64>,
    pub removed: Option<i64>,
    /// Whether the run completed. Older entries don't carry it.
    pub success: Option<bool>,
    /// Failure message of an unsuccessful run.
    pub error: Option<String>,
}

impl ScrapeLogEntry {
    /// Minimal entry, mostly useful when building fixtures.
    pub fn new(timestamp_seconds: i64) -> Self {
        Self {
            id: String::new(),
            timestamp: Some(Timestamp::from_seconds(timestamp_seconds)),
            board: None,
            added: None,
            removed: None,
            success: None,
            error: None,
        }
    }

    pub fn with_board(mut self, board: &str) -> Self {
        self.board = Some(board.to_string());
        self
    }

    pub fn with_added(mut self, added: i64) -> Self {
        self.added = Some(added);
        self
    }

    pub fn with_removed(mut self, removed: i64) -> Self {
        self.removed = Some(removed);
        self
    }

    pub fn with_failure(mut self, error: &str) -> Self {
        self.success = Some(false);
        self.error = Some(error.to_string());
        self
    }

    /// Whether the run is known to have failed.
    pub fn failed(&self) -> bool {
        self.success == Some(false)
    }
}

impl TryFrom<&DocumentSnapshot> for ScrapeLogEntry {
    type Error = QueryError;

    fn try_from(doc: &DocumentSnapshot) -> Result<Self, Self::Error> {
        let raw = doc
            .get("timestamp")
            .filter(|v| !v.is_null())
            .ok_or_else(|| {
                QueryError::Decode(format!("scrape log {} has no timestamp", doc.id()))
            })?;
        let timestamp = raw.as_timestamp().map(|ts| Timestamp {
            seconds: ts.timestamp(),
            nanos: ts.timestamp_subsec_nanos(),
        });
        if timestamp.is_none() {
            warn!("Scrape log {} has a malformed timestamp: {:?}", doc.id(), raw);
        }

        // Null values count as absent.
        let field = |name: &str| doc.get(name).filter(|v| !v.is_null());

        Ok(Self {
            id: doc.id().to_string(),
            timestamp,
            board: field("board").and_then(|v| v.as_str()).map(str::to_string),
            added: field("added").and_then(|v| v.as_i64()),
            removed: field("removed").and_then(|v| v.as_i64()),
            success: field("success").and_then(|v| v.as_bool()),
            error: field("error").and_then(|v| v.as_str()).map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firestore::{Fields, Value};

    fn snapshot(fields: &[(&str, Value)]) -> DocumentSnapshot {
        let fields: Fields = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        DocumentSnapshot::new("projects/p/databases/(default)/documents/scrape_logs/x1", fields)
    }

    #[test]
    fn test_full_entry() {
        let doc = snapshot(&[
            ("timestamp", Value::Timestamp("2023-11-14T22:13:20.5Z".to_string())),
            ("board", Value::String("mainboard".to_string())),
            ("added", Value::Integer("5".to_string())),
            ("removed", Value::Integer("2".to_string())),
            ("success", Value::Boolean(true)),
        ]);
        let entry = ScrapeLogEntry::try_from(&doc).unwrap();
        assert_eq!(entry.id, "x1");
        assert_eq!(
            entry.timestamp,
            Some(Timestamp {
                seconds: 1_700_000_000,
                nanos: 500_000_000
            })
        );
        assert_eq!(entry.board.as_deref(), Some("mainboard"));
        assert_eq!(entry.added, Some(5));
        assert_eq!(entry.removed, Some(2));
        assert!(!entry.failed());
    }

    #[test]
    fn test_optional_fields_absent_or_null() {
        let doc = snapshot(&[
            ("timestamp", Value::Timestamp("2023-11-14T22:13:20Z".to_string())),
            ("board", Value::Null(())),
        ]);
        let entry = ScrapeLogEntry::try_from(&doc).unwrap();
        assert_eq!(entry.board, None);
        assert_eq!(entry.added, None);
        assert_eq!(entry.removed, None);
        assert_eq!(entry.success, None);
    }

    #[test]
    fn test_failed_run() {
        let doc = snapshot(&[
            ("timestamp", Value::Timestamp("2023-11-14T22:13:20Z".to_string())),
            ("success", Value::Boolean(false)),
            ("error", Value::String("Timeout 10000ms exceeded".to_string())),
        ]);
        let entry = ScrapeLogEntry::try_from(&doc).unwrap();
        assert!(entry.failed());
        assert_eq!(entry.error.as_deref(), Some("Timeout 10000ms exceeded"));
    }

    #[test]
    fn test_missing_timestamp_is_decode_error() {
        let doc = snapshot(&[("board", Value::String("mainboard".to_string()))]);
        let err = ScrapeLogEntry::try_from(&doc).unwrap_err();
        assert!(matches!(err, QueryError::Decode(ref m) if m.contains("x1")));
    }

    #[test]
    fn test_null_timestamp_is_decode_error() {
        let doc = snapshot(&[("timestamp", Value::Null(()))]);
        assert!(ScrapeLogEntry::try_from(&doc).is_err());
    }

    #[test]
    fn test_wrongly_typed_timestamp_still_decodes() {
        for raw in [
            Value::Integer("1700003600".to_string()),
            Value::String("yesterday".to_string()),
            Value::Timestamp("not a date".to_string()),
        ] {
            let doc = snapshot(&[
                ("timestamp", raw),
                ("board", Value::String("mainboard".to_string())),
            ]);
            let entry = ScrapeLogEntry::try_from(&doc).unwrap();
            assert_eq!(entry.timestamp, None);
            assert_eq!(entry.board.as_deref(), Some("mainboard"));
        }
    }
}
