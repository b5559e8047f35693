use serde::Deserialize;
use std::collections::HashMap;

/// Structured failure returned by the backend for any non-2xx response.
///
/// Carries the HTTP status, the server's error code and message, and an
/// optional field → message map for validation failures. The backend has
/// emitted two body shapes over its lifetime; [`ApiError::from_body`]
/// accepts both.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: u16,
    /// Server-supplied error code, or the HTTP status text when absent.
    pub error: String,
    pub message: String,
    pub path: Option<String>,
    pub timestamp: Option<String>,
    pub validation_errors: Option<HashMap<String, String>>,
}

/// Flat error body: `{ error?, message?, path?, timestamp?, errors? }`.
/// The nested `_embedded.errors` list is the alternate validation shape.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    path: Option<String>,
    timestamp: Option<String>,
    errors: Option<HashMap<String, String>>,
    #[serde(rename = "_embedded")]
    embedded: Option<EmbeddedErrors>,
}

#[derive(Debug, Deserialize)]
struct EmbeddedErrors {
    #[serde(default)]
    errors: Vec<EmbeddedError>,
}

#[derive(Debug, Deserialize)]
struct EmbeddedError {
    path: Option<String>,
    message: String,
}

impl ApiError {
    /// Build from a raw (possibly empty or malformed) response body.
    ///
    /// Falls back to a status-derived generic message when the body cannot
    /// be parsed, so callers always get a usable error.
    pub fn from_body(status: u16, status_text: &str, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => {
                let validation_errors = parsed.errors.or_else(|| {
                    parsed.embedded.map(|embedded| {
                        embedded
                            .errors
                            .into_iter()
                            .filter_map(|e| e.path.map(|p| (p, e.message)))
                            .collect()
                    })
                });
                Self {
                    status,
                    error: parsed.error.unwrap_or_else(|| status_text.to_string()),
                    message: parsed
                        .message
                        .unwrap_or_else(|| format!("Request failed with status {status}")),
                    path: parsed.path,
                    timestamp: parsed.timestamp,
                    validation_errors,
                }
            }
            Err(_) => Self::from_status(status, status_text),
        }
    }

    /// Build when no body is available at all.
    pub fn from_status(status: u16, status_text: &str) -> Self {
        Self {
            status,
            error: status_text.to_string(),
            message: format!("Request failed with status {status}"),
            path: None,
            timestamp: None,
            validation_errors: None,
        }
    }

    /// Human wording for list banners and CLI output.
    pub fn user_message(&self) -> String {
        match self.status {
            404 => "The requested item was not found. It may have been deleted.".to_string(),
            400 => {
                if self.message.is_empty() {
                    "Invalid data submitted. Please check your input.".to_string()
                } else {
                    self.message.clone()
                }
            }
            409 => "A conflict occurred. The item may have been modified by someone else."
                .to_string(),
            s if s >= 500 => "A server error occurred. Please try again later.".to_string(),
            _ => {
                if self.message.is_empty() {
                    "An unexpected error occurred.".to_string()
                } else {
                    self.message.clone()
                }
            }
        }
    }
}

/// Failure of a single client request: either the backend answered with an
/// error, or the request never completed.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// The typed API error, when the backend produced one.
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(e) => Some(e),
            ClientError::Transport(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_error_body() {
        let body = r#"{
            "error": "Bad Request",
            "message": "Validation failed",
            "path": "/api/parts",
            "timestamp": "2024-03-01T10:00:00Z",
            "errors": { "name": "Name is required" }
        }"#;
        let err = ApiError::from_body(400, "Bad Request", body);
        assert_eq!(err.status, 400);
        assert_eq!(err.message, "Validation failed");
        assert_eq!(err.path.as_deref(), Some("/api/parts"));
        let map = err.validation_errors.unwrap();
        assert_eq!(map.get("name").map(String::as_str), Some("Name is required"));
    }

    #[test]
    fn reduces_embedded_error_list_to_field_map() {
        let body = r#"{
            "message": "Bad Request",
            "_embedded": {
                "errors": [
                    { "path": "quantity", "message": "must be at least 1" },
                    { "path": "location", "message": "must not be blank" },
                    { "message": "no path, dropped" }
                ]
            }
        }"#;
        let err = ApiError::from_body(400, "Bad Request", body);
        let map = err.validation_errors.unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get("quantity").map(String::as_str),
            Some("must be at least 1")
        );
    }

    #[test]
    fn malformed_body_falls_back_to_status_message() {
        let err = ApiError::from_body(502, "Bad Gateway", "<html>upstream died</html>");
        assert_eq!(err.status, 502);
        assert_eq!(err.error, "Bad Gateway");
        assert_eq!(err.message, "Request failed with status 502");
        assert!(err.validation_errors.is_none());
    }

    #[test]
    fn user_message_wording_by_status() {
        let not_found = ApiError::from_status(404, "Not Found");
        assert!(not_found.user_message().contains("not found"));

        let conflict = ApiError::from_status(409, "Conflict");
        assert!(conflict.user_message().contains("conflict"));

        let server = ApiError::from_status(503, "Service Unavailable");
        assert!(server.user_message().contains("try again later"));

        let bad_request = ApiError::from_body(400, "Bad Request", r#"{"message":"Quantity must be positive"}"#);
        assert_eq!(bad_request.user_message(), "Quantity must be positive");
    }
}
