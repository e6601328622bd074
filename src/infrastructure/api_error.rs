// Errors from the BroiLink REST API and their user-facing messages
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Build from a non-2xx response and its (possibly empty) JSON body.
    pub fn from_status(status: u16, body: &Value) -> Self {
        ApiError::Status {
            status,
            message: status_message(status, body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message safe to show to a dashboard user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport { .. } => {
                "Cannot reach the server. Please check your internet connection.".to_string()
            }
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Decode { .. } => "The server sent an unreadable response.".to_string(),
        }
    }
}

fn status_message(status: u16, body: &Value) -> String {
    let backend_message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty());
    let or_backend = |fallback: &str| backend_message.unwrap_or(fallback).to_string();

    match status {
        400 => or_backend("Invalid request. Please check your input."),
        401 => "Your session has ended. Please log in again.".to_string(),
        403 => "You do not have permission to perform this action.".to_string(),
        404 => "The requested data was not found.".to_string(),
        419 => "Session expired. Please refresh and try again.".to_string(),
        422 => first_validation_error(body)
            .unwrap_or_else(|| or_backend("Validation failed. Please check your input.")),
        500 => "A server error occurred. Please try again later.".to_string(),
        _ => or_backend("An unexpected error occurred."),
    }
}

/// First message of a `{errors: {field: [msg, ...]}}` validation body.
fn first_validation_error(body: &Value) -> Option<String> {
    let (_, first) = body.get("errors")?.as_object()?.iter().next()?;
    match first {
        Value::Array(messages) => messages.first()?.as_str().map(str::to_string),
        Value::String(message) => Some(message.clone()),
        _ => None,
    }
}
