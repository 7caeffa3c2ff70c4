//! Read-only access to a Firestore database.
//!
//! [`DocumentStore`] is the seam between the dashboard and the database:
//! [`FirestoreClient`] talks to the REST API, [`MemoryStore`] serves fixed
//! documents for tests and offline rendering.

mod client;
mod memory;
mod value;
mod wire;

pub use client::{FirestoreClient, FirestoreSettings, DEFAULT_ENDPOINT};
pub use memory::MemoryStore;
pub use value::{ArrayValue, Fields, GeoPoint, MapValue, Value};

use async_trait::async_trait;

use crate::error::QueryError;

/// Reference to a named collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRef {
    name: String,
}

impl CollectionRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Sort direction for an ordered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    /// Name used by the REST API.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "ASCENDING",
            Direction::Descending => "DESCENDING",
        }
    }
}

/// A single ordering clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Build an ordering clause.
pub fn order_by(field: impl Into<String>, direction: Direction) -> OrderBy {
    OrderBy {
        field: field.into(),
        direction,
    }
}

/// Query descriptor over one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub collection: CollectionRef,
    pub order_by: Vec<OrderBy>,
    pub limit: Option<u32>,
}

impl Query {
    pub fn new(collection: CollectionRef) -> Self {
        Self {
            collection,
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    pub fn limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }
}

/// Build a query over `collection` with a single ordering clause.
pub fn query(collection: CollectionRef, order: OrderBy) -> Query {
    Query::new(collection).order_by(order)
}

/// A document returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    name: String,
    fields: Fields,
}

impl DocumentSnapshot {
    /// `name` is the full resource name, e.g.
    /// `projects/p/databases/(default)/documents/scrape_logs/abc`.
    pub fn new(name: impl Into<String>, fields: Fields) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Document id, the last segment of the resource name.
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    pub fn data(&self) -> &Fields {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Result of a server-side count aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateSnapshot {
    count: u64,
}

/// Aggregate fields of an [`AggregateSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateData {
    pub count: u64,
}

impl AggregateSnapshot {
    pub fn new(count: u64) -> Self {
        Self { count }
    }

    pub fn data(&self) -> AggregateData {
        AggregateData { count: self.count }
    }
}

/// Read operations the dashboard needs from a document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reference a collection by name.
    fn collection(&self, name: &str) -> CollectionRef {
        CollectionRef::new(name)
    }

    /// Run a query and return every matching document in query order.
    async fn get_docs(&self, query: &Query) -> Result<Vec<DocumentSnapshot>, QueryError>;

    /// Count the documents of a collection without transferring them.
    async fn get_count_from_server(
        &self,
        collection: &CollectionRef,
    ) -> Result<AggregateSnapshot, QueryError>;
}
