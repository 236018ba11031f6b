use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(Value),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Request rejected ({status}): {body}")]
    Rejected { status: StatusCode, body: Value },

    #[error("Upstream error ({status}): {body}")]
    Upstream { status: StatusCode, body: Value },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Operator input (a `--data @file`, an upload path) could not be used.
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Token storage error: {0}")]
    Storage(anyhow::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Storage(anyhow::Error::new(err))
    }
}

impl ApiError {
    /// Classify a non-success response by status code.
    pub fn from_status(status: StatusCode, body: Value) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(body),
            StatusCode::NOT_FOUND => ApiError::NotFound(detail_from_body(&body)),
            s if s.is_client_error() => ApiError::Rejected { status: s, body },
            s => ApiError::Upstream { status: s, body },
        }
    }

    /// HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            ApiError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ApiError::Rejected { status, .. } | ApiError::Upstream { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Human-readable message suitable for showing to an operator.
    ///
    /// Backend errors prefer the `detail` field, then the first field error
    /// (`{"name": ["This field is required."]}` becomes
    /// `name: This field is required.`).
    pub fn detail(&self) -> String {
        match self {
            ApiError::Unauthorized(body)
            | ApiError::Rejected { body, .. }
            | ApiError::Upstream { body, .. } => detail_from_body(body),
            ApiError::Authentication(msg) | ApiError::NotFound(msg) | ApiError::Input(msg) => {
                msg.clone()
            }
            other => other.to_string(),
        }
    }
}

fn detail_from_body(body: &Value) -> String {
    match body {
        Value::Null => "no details provided".to_string(),
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            if let Some(detail) = map.get("detail").and_then(Value::as_str) {
                return detail.to_string();
            }
            map.iter()
                .find_map(|(field, errors)| {
                    first_message(errors).map(|msg| format!("{}: {}", field, msg))
                })
                .unwrap_or_else(|| body.to_string())
        }
        other => first_message(other).unwrap_or_else(|| other.to_string()),
    }
}

fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(first_message),
        _ => None,
    }
}
