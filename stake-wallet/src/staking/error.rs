//! Staking API errors

use serde::Deserialize;
use thiserror::Error;

/// Failure of a staking API call. Nothing here is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StakingApiError {
    /// The request body or path was rejected (400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The API key is missing or invalid (401/403)
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// The service has no validator capacity left
    #[error("Insufficient validators available: {0}")]
    InsufficientValidators(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response ({status}): {message}")]
    Unexpected { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Error body shapes returned by the service
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    title: Option<String>,
    detail: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl StakingApiError {
    /// Map a non-success status and its body to an error kind
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = error_message(status, body);

        if message.to_lowercase().contains("insufficient validators") {
            return StakingApiError::InsufficientValidators(message);
        }

        match status {
            400 | 422 => StakingApiError::InvalidRequest(message),
            401 | 403 => StakingApiError::Unauthorized(message),
            409 => StakingApiError::InsufficientValidators(message),
            500..=599 => StakingApiError::Server { status, message },
            _ => StakingApiError::Unexpected { status, message },
        }
    }
}

fn error_message(status: u16, body: &str) -> String {
    let body = body.trim();

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        let message = match (parsed.title, parsed.detail.or(parsed.message).or(parsed.error)) {
            (Some(title), Some(detail)) => Some(format!("{}: {}", title, detail)),
            (title, detail) => detail.or(title),
        };
        if let Some(message) = message {
            return message;
        }
    }

    if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        body.to_string()
    }
}
