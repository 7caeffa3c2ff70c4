//! In-memory [`DocumentStore`].

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{
    AggregateSnapshot, CollectionRef, Direction, DocumentSnapshot, DocumentStore, Query, Value,
};
use crate::error::QueryError;

/// Fixed set of collections held in memory.
///
/// Ordering follows the query's clauses; a collection can be marked as
/// failing to exercise error paths.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<DocumentSnapshot>>>,
    failing: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document to `collection`.
    pub fn insert(&self, collection: &str, doc: DocumentSnapshot) {
        if let Ok(mut collections) = self.collections.write() {
            collections
                .entry(collection.to_string())
                .or_default()
                .push(doc);
        }
    }

    /// Make every read of `collection` fail with a service error.
    pub fn fail_collection(&self, collection: &str, message: &str) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(collection.to_string(), message.to_string());
        }
    }

    fn check_failure(&self, collection: &str) -> Result<(), QueryError> {
        let failing = self
            .failing
            .read()
            .map_err(|e| QueryError::Connection(e.to_string()))?;
        match failing.get(collection) {
            Some(message) => Err(QueryError::Service {
                status: "UNAVAILABLE".to_string(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Order two optional field values the way Firestore sorts mixed types:
/// null first, then booleans, numbers, timestamps, strings.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null(())) => 0,
            Some(Value::Boolean(_)) => 1,
            Some(Value::Integer(_)) | Some(Value::Double(_)) => 2,
            Some(Value::Timestamp(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(_) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Boolean(x)), Some(Value::Boolean(y))) => x.cmp(y),
        (Some(Value::Timestamp(_)), Some(Value::Timestamp(_))) => {
            let x = a.and_then(Value::as_timestamp);
            let y = b.and_then(Value::as_timestamp);
            x.cmp(&y)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) if rank(a) == 2 && rank(b) == 2 => {
            let x = x.as_i64().unwrap_or_default();
            let y = y.as_i64().unwrap_or_default();
            x.cmp(&y)
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_docs(&self, query: &Query) -> Result<Vec<DocumentSnapshot>, QueryError> {
        let name = query.collection.name();
        self.check_failure(name)?;

        let collections = self
            .collections
            .read()
            .map_err(|e| QueryError::Connection(e.to_string()))?;
        // Ordering by a field excludes documents that lack it.
        let mut docs: Vec<DocumentSnapshot> = collections
            .get(name)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| query.order_by.iter().all(|o| doc.get(&o.field).is_some()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        docs.sort_by(|a, b| {
            for order in &query.order_by {
                let ord = compare_values(a.get(&order.field), b.get(&order.field));
                let ord = match order.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            Ordering::Equal
        });

        if let Some(limit) = query.limit {
            docs.truncate(limit as usize);
        }
        Ok(docs)
    }

    async fn get_count_from_server(
        &self,
        collection: &CollectionRef,
    ) -> Result<AggregateSnapshot, QueryError> {
        self.check_failure(collection.name())?;
        let collections = self
            .collections
            .read()
            .map_err(|e| QueryError::Connection(e.to_string()))?;
        let count = collections.get(collection.name()).map_or(0, Vec::len);
        Ok(AggregateSnapshot::new(count as u64))
    }
}
