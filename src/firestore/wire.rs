//! Request and response bodies of the Firestore REST API.

use serde::{Deserialize, Serialize};

use super::{Fields, Query, Value};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunQueryRequest<'a> {
    pub structured_query: StructuredQuery<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StructuredQuery<'a> {
    pub from: Vec<CollectionSelector<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<Order<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollectionSelector<'a> {
    pub collection_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct Order<'a> {
    pub field: FieldReference<'a>,
    pub direction: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FieldReference<'a> {
    pub field_path: &'a str,
}

impl<'a> StructuredQuery<'a> {
    pub fn from_query(query: &'a Query) -> Self {
        Self {
            from: vec![CollectionSelector {
                collection_id: query.collection.name(),
            }],
            order_by: query
                .order_by
                .iter()
                .map(|o| Order {
                    field: FieldReference {
                        field_path: &o.field,
                    },
                    direction: o.direction.as_api_str(),
                })
                .collect(),
            limit: query.limit,
        }
    }

    pub fn whole_collection(collection_id: &'a str) -> Self {
        Self {
            from: vec![CollectionSelector { collection_id }],
            order_by: Vec::new(),
            limit: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RunAggregationQueryRequest<'a> {
    pub structured_aggregation_query: StructuredAggregationQuery<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StructuredAggregationQuery<'a> {
    pub structured_query: StructuredQuery<'a>,
    pub aggregations: Vec<Aggregation>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Aggregation {
    pub alias: &'static str,
    pub count: CountAggregation,
}

#[derive(Debug, Serialize)]
pub(crate) struct CountAggregation {}

/// Alias under which the count aggregate is requested and returned.
pub(crate) const COUNT_ALIAS: &str = "count";

/// One element of the streamed `runQuery` response array.
/// Elements carrying only `readTime` (e.g. for an empty result) have no document.
#[derive(Debug, Deserialize)]
pub(crate) struct RunQueryResponseItem {
    #[serde(default)]
    pub document: Option<WireDocument>,
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireDocument {
    pub name: String,
    #[serde(default)]
    pub fields: Fields,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunAggregationResponseItem {
    #[serde(default)]
    pub result: Option<AggregationResult>,
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AggregationResult {
    #[serde(default)]
    pub aggregate_fields: std::collections::BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

/// Google API error payload.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl ErrorBody {
    /// Status name, falling back to the numeric code.
    pub fn status_name(&self) -> String {
        match (&self.status, self.code) {
            (Some(status), _) => status.clone(),
            (None, Some(code)) => code.to_string(),
            (None, None) => "UNKNOWN".to_string(),
        }
    }
}

/// Extract an error payload from an error response body.
/// Firestore sends either a bare envelope or an array whose first element is one.
/// Serde accepts a sequence for a struct too, so the array form must be tried
/// on its own rather than as a fallback.
pub(crate) fn parse_error_body(body: &str) -> Option<ErrorBody> {
    if body.trim_start().starts_with('[') {
        return serde_json::from_str::<Vec<ErrorEnvelope>>(body)
            .ok()
            .and_then(|items| items.into_iter().next())
            .map(|e| e.error);
    }
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firestore::{order_by, query, CollectionRef, Direction};
    use serde_json::json;

    #[test]
    fn test_run_query_body() {
        let q = query(
            CollectionRef::new("scrape_logs"),
            order_by("timestamp", Direction::Descending),
        );
        let body = RunQueryRequest {
            structured_query: StructuredQuery::from_query(&q),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "structuredQuery": {
                    "from": [{"collectionId": "scrape_logs"}],
                    "orderBy": [{
                        "field": {"fieldPath": "timestamp"},
                        "direction": "DESCENDING"
                    }]
                }
            })
        );
    }

    #[test]
    fn test_run_query_body_with_limit() {
        let q = Query::new(CollectionRef::new("scrape_logs")).limit(Some(25));
        let body = serde_json::to_value(StructuredQuery::from_query(&q)).unwrap();
        assert_eq!(body["limit"], json!(25));
        assert!(body.get("orderBy").is_none());
    }

    #[test]
    fn test_count_body() {
        let body = RunAggregationQueryRequest {
            structured_aggregation_query: StructuredAggregationQuery {
                structured_query: StructuredQuery::whole_collection("models"),
                aggregations: vec![Aggregation {
                    alias: COUNT_ALIAS,
                    count: CountAggregation {},
                }],
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "structuredAggregationQuery": {
                    "structuredQuery": {"from": [{"collectionId": "models"}]},
                    "aggregations": [{"alias": "count", "count": {}}]
                }
            })
        );
    }

    #[test]
    fn test_parse_query_response_skips_read_time_only_items() {
        let body = r#"[
            {"document": {"name": "projects/p/databases/(default)/documents/scrape_logs/a",
                          "fields": {"board": {"stringValue": "mainboard"}}},
             "readTime": "2024-01-01T00:00:00Z"},
            {"readTime": "2024-01-01T00:00:00Z"}
        ]"#;
        let items: Vec<RunQueryResponseItem> = serde_json::from_str(body).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[0].document.is_some());
        assert!(items[1].document.is_none());
    }

    #[test]
    fn test_parse_error_body_variants() {
        let single = r#"{"error": {"code": 403, "message": "denied", "status": "PERMISSION_DENIED"}}"#;
        let err = parse_error_body(single).unwrap();
        assert_eq!(err.status_name(), "PERMISSION_DENIED");
        assert_eq!(err.message, "denied");

        let array = r#"[{"error": {"code": 404, "message": "no db"}}]"#;
        let err = parse_error_body(array).unwrap();
        assert_eq!(err.status_name(), "404");
        assert_eq!(err.message, "no db");

        let streamed = r#"
            [{"error": {"code": 403, "message": "Missing or insufficient permissions.",
                        "status": "PERMISSION_DENIED"}}]"#;
        let err = parse_error_body(streamed).unwrap();
        assert_eq!(err.status_name(), "PERMISSION_DENIED");
        assert_eq!(err.message, "Missing or insufficient permissions.");

        assert!(parse_error_body("<html>bad gateway</html>").is_none());
    }
}
