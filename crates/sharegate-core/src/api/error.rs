use serde_json::Value;
use thiserror::Error;

use crate::utils::truncate_string;

/// Message used when an error response carries no usable `message` field
pub const DEFAULT_API_ERROR_MESSAGE: &str = "API request failed";

/// Maximum length for server-supplied error messages
const MAX_ERROR_MESSAGE_LENGTH: usize = 500;

/// Failure to complete an HTTP exchange at all.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// For transports that do not go through reqwest.
    #[error("Server unreachable: {0}")]
    Unreachable(String),

    #[error("Response was not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Invalid multipart body: {0}")]
    InvalidMultipart(String),
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthenticated,

    /// The server answered outside the 2xx range.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Refused locally before any request was made.
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    /// Build the error for a non-success response from its parsed body.
    pub fn from_response(status: u16, payload: &Value) -> Self {
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(|m| truncate_string(m, MAX_ERROR_MESSAGE_LENGTH))
            .unwrap_or_else(|| DEFAULT_API_ERROR_MESSAGE.to_string());
        ApiError::Api { status, message }
    }

    /// True when the exchange itself failed, as opposed to the server
    /// answering with an error.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
