//! Queries behind the dashboard.

use tracing::{debug, warn};

use crate::error::QueryError;
use crate::firestore::{order_by, query, Direction, DocumentStore};
use crate::models::ScrapeLogEntry;

/// Collection written by the scrapers after every run.
pub const SCRAPE_LOGS_COLLECTION: &str = "scrape_logs";
/// Collection holding one document per model.
pub const MODELS_COLLECTION: &str = "models";
/// Field the scrape logs are ordered by.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Fetch scrape logs, newest first.
///
/// `limit` caps the number of entries; `None` fetches the whole collection.
pub async fn fetch_recent_scrape_logs(
    store: &dyn DocumentStore,
    limit: Option<u32>,
) -> Result<Vec<ScrapeLogEntry>, QueryError> {
    let q = query(
        store.collection(SCRAPE_LOGS_COLLECTION),
        order_by(TIMESTAMP_FIELD, Direction::Descending),
    )
    .limit(limit);

    let docs = store.get_docs(&q).await?;
    let entries = docs
        .iter()
        .map(ScrapeLogEntry::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    if entries.windows(2).any(|pair| {
        matches!((pair[0].timestamp, pair[1].timestamp), (Some(a), Some(b)) if a < b)
    }) {
        warn!("Scrape logs arrived out of timestamp order");
    }

    debug!("Loaded {} scrape log entries", entries.len());
    Ok(entries)
}

/// Count the models collection with a server-side aggregate.
pub async fn fetch_model_count(store: &dyn DocumentStore) -> Result<u64, QueryError> {
    let snapshot = store
        .get_count_from_server(&store.collection(MODELS_COLLECTION))
        .await?;
    Ok(snapshot.data().count)
}
