//! Error types for the DPA Guard client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// HTTP statuses worth retrying without user involvement
const RETRYABLE_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Errors that can occur when using the DPA Guard client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("HTTP {status} {reason}: {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase of the status
        reason: String,
        /// Error message extracted from the response body
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from a status code and the raw response body
    ///
    /// The message is taken from a JSON `message` field, then `detail`,
    /// then the body text itself, falling back to "Request failed".
    pub fn api_error(status: u16, reason: impl Into<String>, body: &str) -> Self {
        Self::ApiError {
            status,
            reason: reason.into(),
            message: extract_message(body),
        }
    }

    /// HTTP status associated with the failure, when there is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }

    /// Check if retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed(e) if e.is_timeout() || e.is_connect() => true,
            _ => self.status().is_some_and(is_retryable_http_status),
        }
    }
}

/// Whether an HTTP status denotes a transient condition
pub fn is_retryable_http_status(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// Formats an error for display to the user, appending the HTTP status when present
pub fn format_error(err: &ClientError) -> String {
    match err.status() {
        Some(status) => format!("{} (status {})", err, status),
        None => err.to_string(),
    }
}

fn extract_message(body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(fields)) => ["message", "detail"]
            .iter()
            .filter_map(|key| fields.get(*key))
            .find_map(|value| match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) if s.is_empty() => None,
                serde_json::Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .unwrap_or_else(|| "Request failed".to_string()),
        Ok(serde_json::Value::String(s)) if !s.is_empty() => s,
        Ok(_) => "Request failed".to_string(),
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => "Request failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_extraction() {
        let err = ClientError::api_error(404, "Not Found", r#"{"detail":"Review not found"}"#);
        assert_eq!(err.to_string(), "HTTP 404 Not Found: Review not found");

        let err = ClientError::api_error(500, "Internal Server Error", r#"{"message":"boom","detail":"x"}"#);
        assert_eq!(err.to_string(), "HTTP 500 Internal Server Error: boom");

        let err = ClientError::api_error(502, "Bad Gateway", "upstream down");
        assert_eq!(err.to_string(), "HTTP 502 Bad Gateway: upstream down");

        let err = ClientError::api_error(503, "Service Unavailable", "");
        assert_eq!(err.to_string(), "HTTP 503 Service Unavailable: Request failed");
    }

    #[test]
    fn test_structured_detail_is_serialized() {
        let err = ClientError::api_error(422, "Unprocessable Entity", r#"{"detail":[{"msg":"bad"}]}"#);
        assert_eq!(
            err.to_string(),
            r#"HTTP 422 Unprocessable Entity: [{"msg":"bad"}]"#
        );
    }

    #[test]
    fn test_format_error_appends_status() {
        let err = ClientError::api_error(409, "Conflict", r#"{"detail":"Review not ready for processing"}"#);
        assert_eq!(
            format_error(&err),
            "HTTP 409 Conflict: Review not ready for processing (status 409)"
        );

        let err = ClientError::ParseError("expected value".to_string());
        assert_eq!(format_error(&err), "Failed to parse response: expected value");
    }

    #[test]
    fn test_status_classification() {
        let not_found = ClientError::api_error(404, "Not Found", "");
        assert!(not_found.is_not_found());
        assert!(not_found.is_client_error());
        assert!(!not_found.is_server_error());
        assert!(!not_found.is_retryable());

        let unavailable = ClientError::api_error(503, "Service Unavailable", "");
        assert!(unavailable.is_server_error());
        assert!(unavailable.is_retryable());

        assert!(is_retryable_http_status(429));
        assert!(!is_retryable_http_status(501));
        assert!(!ClientError::ParseError(String::new()).is_retryable());
    }
}
