//! Error types for scrapeboard.

use thiserror::Error;

/// Failure to retrieve data from the document database.
///
/// Covers transport failures, service-side rejections (permission denied,
/// unavailable, missing database) and responses that cannot be decoded.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The request never produced a response.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The service answered with an error status or error body.
    #[error("Service error ({status}): {message}")]
    Service { status: String, message: String },

    /// The response or a document in it could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl QueryError {
    /// Whether the service rejected the request for lack of permission.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, QueryError::Service { status, .. } if status == "PERMISSION_DENIED" || status == "403")
    }
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            QueryError::Decode(err.to_string())
        } else {
            QueryError::Connection(err.to_string())
        }
    }
}

/// Invalid or incomplete configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_detection() {
        let err = QueryError::Service {
            status: "PERMISSION_DENIED".to_string(),
            message: "Missing or insufficient permissions.".to_string(),
        };
        assert!(err.is_permission_denied());

        let err = QueryError::Service {
            status: "UNAVAILABLE".to_string(),
            message: "try later".to_string(),
        };
        assert!(!err.is_permission_denied());
        assert!(!QueryError::Connection("refused".to_string()).is_permission_denied());
    }

    #[test]
    fn test_display_includes_status() {
        let err = QueryError::Service {
            status: "NOT_FOUND".to_string(),
            message: "database does not exist".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Service error (NOT_FOUND): database does not exist"
        );
    }
}
