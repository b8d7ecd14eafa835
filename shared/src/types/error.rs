//! Errors raised while talking to the hosted storage and database APIs

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Failure of a single backend call.
///
/// `NotFound` is reserved for "no such row or object" outcomes that a
/// caller has recognised as such. A bare HTTP 404 stays an `Api` error,
/// since PostgREST also answers 404 for a missing table.
///
/// The `Display` output is the bare backend message so that handlers can
/// embed it in their own error envelopes.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Decode(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Error body shapes returned by the storage API and PostgREST.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    /// The storage API sends this as a string or a number depending on the route
    #[serde(rename = "statusCode")]
    status_code: Option<Value>,
    code: Option<String>,
    message: Option<String>,
    error: Option<String>,
    msg: Option<String>,
}

impl BackendError {
    /// Build an error from a non-success HTTP response.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        // The storage API reports some failures as 400 with the real code in the body
        let effective_status = parsed
            .status_code
            .as_ref()
            .and_then(status_from_value)
            .unwrap_or(status);

        let message = parsed
            .message
            .or(parsed.msg)
            .or(parsed.error)
            .or(parsed.code)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    format!("backend responded with HTTP {}", status)
                } else {
                    trimmed.to_string()
                }
            });

        match effective_status {
            409 => BackendError::Conflict(message),
            _ => BackendError::Api {
                status: effective_status,
                message,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            BackendError::NotFound(_) => 404,
            BackendError::Conflict(_) => 409,
            BackendError::Api { status, .. } => *status,
            BackendError::Transport(_) => 502,
            BackendError::Decode(_) => 502,
        }
    }
}

fn status_from_value(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BackendError::Decode(err.to_string())
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_duplicate_maps_to_conflict() {
        let body = r#"{"statusCode":"409","error":"Duplicate","message":"The resource already exists"}"#;
        let err = BackendError::from_response(400, body);

        assert!(matches!(err, BackendError::Conflict(_)));
        assert_eq!(err.to_string(), "The resource already exists");
        assert_eq!(err.http_status_code(), 409);
    }

    #[test]
    fn test_numeric_status_code_in_body() {
        let body = r#"{"statusCode":409,"error":"Duplicate","message":"The resource already exists"}"#;
        let err = BackendError::from_response(400, body);

        assert!(matches!(err, BackendError::Conflict(_)));
        assert_eq!(err.to_string(), "The resource already exists");
    }

    #[test]
    fn test_missing_table_is_not_a_missing_row() {
        let body = r#"{"code":"42P01","details":null,"hint":null,"message":"relation \"public.materials\" does not exist"}"#;
        let err = BackendError::from_response(404, body);

        assert!(!err.is_not_found());
        assert!(matches!(err, BackendError::Api { status: 404, .. }));
        assert_eq!(err.to_string(), "relation \"public.materials\" does not exist");
    }

    #[test]
    fn test_non_json_body_is_used_verbatim() {
        let err = BackendError::from_response(502, "  Bad Gateway  ");
        assert_eq!(err.to_string(), "Bad Gateway");

        let err = BackendError::from_response(500, "");
        assert_eq!(err.to_string(), "backend responded with HTTP 500");
        assert_eq!(err.http_status_code(), 500);
    }
}
