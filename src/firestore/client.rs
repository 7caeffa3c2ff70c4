//! Firestore REST client.
//!
//! Uses the `runQuery` and `runAggregationQuery` endpoints of the v1 API.
//! Only reads are issued.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use super::wire::{
    parse_error_body, Aggregation, CountAggregation, RunAggregationQueryRequest,
    RunAggregationResponseItem, RunQueryRequest, RunQueryResponseItem, StructuredAggregationQuery,
    StructuredQuery, COUNT_ALIAS,
};
use super::{AggregateSnapshot, CollectionRef, DocumentSnapshot, DocumentStore, Query};
use crate::error::{ConfigError, QueryError};

/// Public Firestore REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com";

const USER_AGENT: &str = "scrapeboard/0.1";

/// Connection settings for [`FirestoreClient`].
#[derive(Debug, Clone)]
pub struct FirestoreSettings {
    /// Google Cloud project id.
    pub project_id: String,
    /// Database id within the project.
    pub database: String,
    /// Web API key, sent as the `key` query parameter.
    pub api_key: Option<String>,
    /// Bearer token for databases whose rules require an authenticated reader.
    pub auth_token: Option<String>,
    /// Base URL of the REST API (overridable for emulators).
    pub endpoint: String,
    /// Request timeout in seconds.
    pub request_timeout: u64,
    /// User agent for HTTP requests.
    pub user_agent: String,
}

impl Default for FirestoreSettings {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database: "(default)".to_string(),
            api_key: None,
            auth_token: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: 30,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// [`DocumentStore`] backed by the Firestore REST API.
#[derive(Clone)]
pub struct FirestoreClient {
    client: Client,
    documents_url: String,
    api_key: Option<String>,
    auth_token: Option<String>,
}

impl FirestoreClient {
    /// Create a client. Fails if the settings cannot form a valid endpoint.
    pub fn new(settings: &FirestoreSettings) -> Result<Self, ConfigError> {
        if settings.project_id.trim().is_empty() {
            return Err(ConfigError::Missing("project_id"));
        }

        let endpoint = Url::parse(&settings.endpoint).map_err(|e| ConfigError::Invalid {
            key: "endpoint",
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .user_agent(&settings.user_agent)
            .timeout(Duration::from_secs(settings.request_timeout))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| ConfigError::Invalid {
                key: "http_client",
                reason: e.to_string(),
            })?;

        let documents_url = format!(
            "{}/v1/projects/{}/databases/{}/documents",
            endpoint.as_str().trim_end_matches('/'),
            settings.project_id,
            settings.database
        );

        Ok(Self {
            client,
            documents_url,
            api_key: settings.api_key.clone(),
            auth_token: settings.auth_token.clone(),
        })
    }

    /// URL of a `documents:<method>` endpoint.
    fn method_url(&self, method: &str) -> String {
        format!("{}:{}", self.documents_url, method)
    }

    /// POST a JSON body and decode the JSON response.
    async fn post<B, R>(&self, method: &str, body: &B) -> Result<R, QueryError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.method_url(method);
        let mut request = self.client.post(&url).json(body);
        if let Some(ref key) = self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }

        let start = Instant::now();
        let resp = request.send().await?;
        let status = resp.status();
        debug!(
            "{} -> HTTP {} in {}ms",
            method,
            status.as_u16(),
            start.elapsed().as_millis()
        );

        let text = resp.text().await?;
        if !status.is_success() {
            return Err(match parse_error_body(&text) {
                Some(err) => QueryError::Service {
                    status: err.status_name(),
                    message: err.message,
                },
                None => QueryError::Service {
                    status: status.as_u16().to_string(),
                    message: text.chars().take(200).collect(),
                },
            });
        }

        serde_json::from_str(&text).map_err(|e| QueryError::Decode(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn get_docs(&self, query: &Query) -> Result<Vec<DocumentSnapshot>, QueryError> {
        let body = RunQueryRequest {
            structured_query: StructuredQuery::from_query(query),
        };
        let items: Vec<RunQueryResponseItem> = self.post("runQuery", &body).await?;

        let mut docs = Vec::with_capacity(items.len());
        for item in items {
            if let Some(err) = item.error {
                return Err(QueryError::Service {
                    status: err.status_name(),
                    message: err.message,
                });
            }
            if let Some(doc) = item.document {
                docs.push(DocumentSnapshot::new(doc.name, doc.fields));
            }
        }

        debug!(
            "Fetched {} documents from {}",
            docs.len(),
            query.collection.name()
        );
        Ok(docs)
    }

    async fn get_count_from_server(
        &self,
        collection: &CollectionRef,
    ) -> Result<AggregateSnapshot, QueryError> {
        let body = RunAggregationQueryRequest {
            structured_aggregation_query: StructuredAggregationQuery {
                structured_query: StructuredQuery::whole_collection(collection.name()),
                aggregations: vec![Aggregation {
                    alias: COUNT_ALIAS,
                    count: CountAggregation {},
                }],
            },
        };
        let items: Vec<RunAggregationResponseItem> =
            self.post("runAggregationQuery", &body).await?;

        for item in items {
            if let Some(err) = item.error {
                return Err(QueryError::Service {
                    status: err.status_name(),
                    message: err.message,
                });
            }
            if let Some(result) = item.result {
                let count = result
                    .aggregate_fields
                    .get(COUNT_ALIAS)
                    .and_then(|v| v.as_i64())
                    .and_then(|n| u64::try_from(n).ok())
                    .ok_or_else(|| {
                        QueryError::Decode(format!(
                            "aggregation result for {} has no count",
                            collection.name()
                        ))
                    })?;
                return Ok(AggregateSnapshot::new(count));
            }
        }

        Err(QueryError::Decode(format!(
            "empty aggregation response for {}",
            collection.name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> FirestoreSettings {
        FirestoreSettings {
            project_id: "agency-database".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_method_url() {
        let client = FirestoreClient::new(&settings()).unwrap();
        assert_eq!(
            client.method_url("runQuery"),
            "https://firestore.googleapis.com/v1/projects/agency-database/databases/(default)/documents:runQuery"
        );
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let client = FirestoreClient::new(&FirestoreSettings {
            endpoint: "http://localhost:8080/".to_string(),
            ..settings()
        })
        .unwrap();
        assert!(client
            .method_url("runAggregationQuery")
            .starts_with("http://localhost:8080/v1/projects/"));
    }

    #[test]
    fn test_missing_project_rejected() {
        let result = FirestoreClient::new(&FirestoreSettings::default());
        assert!(matches!(result, Err(ConfigError::Missing("project_id"))));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let result = FirestoreClient::new(&FirestoreSettings {
            endpoint: "not a url".to_string(),
            ..settings()
        });
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "endpoint", .. })
        ));
    }
}
