//! Error handling module for the FarmTrack client.
//!
//! Provides a single error type covering transport, HTTP status, decoding,
//! validation and session failures, plus helpers that turn an error into the
//! message a user should see.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const API_ERROR: &str = "API_ERROR";
    pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const SESSION_ERROR: &str = "SESSION_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Client error type.
#[derive(Debug)]
pub enum ClientError {
    /// Server rejected the credentials (HTTP 401)
    Unauthorized(String),
    /// Resource not found (HTTP 404)
    NotFound(String),
    /// Request payload failed local checks; nothing was sent
    Validation(Vec<FieldError>),
    /// Any other non-success HTTP status
    Api { status: u16, message: String },
    /// Connection, timeout or other transport failure
    Network(String),
    /// Response body did not match the expected contract
    Decode(String),
    /// Session could not be loaded or persisted
    Session(String),
    /// Invalid configuration
    Config(String),
}

impl ClientError {
    /// Build an error from a non-success status and the server's message, if any.
    pub fn from_status(status: StatusCode, server_message: Option<String>) -> Self {
        let message = server_message.unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Get the HTTP status this error came from, if it came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::NotFound(_) => Some(404),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Unauthorized(_) => codes::UNAUTHORIZED,
            ClientError::NotFound(_) => codes::NOT_FOUND,
            ClientError::Validation(_) => codes::VALIDATION_ERROR,
            ClientError::Api { .. } => codes::API_ERROR,
            ClientError::Network(_) => codes::NETWORK_ERROR,
            ClientError::Decode(_) => codes::DECODE_ERROR,
            ClientError::Session(_) => codes::SESSION_ERROR,
            ClientError::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::Unauthorized(msg) => msg.clone(),
            ClientError::NotFound(msg) => msg.clone(),
            ClientError::Validation(errors) => errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("; "),
            ClientError::Api { message, .. } => message.clone(),
            ClientError::Network(msg) => msg.clone(),
            ClientError::Decode(msg) => msg.clone(),
            ClientError::Session(msg) => msg.clone(),
            ClientError::Config(msg) => msg.clone(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound(_))
    }

    /// Message to show the user: the server-provided text for HTTP failures,
    /// otherwise the given fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Unauthorized(msg)
            | ClientError::NotFound(msg)
            | ClientError::Api { message: msg, .. }
                if !msg.is_empty() =>
            {
                msg.clone()
            }
            ClientError::Validation(_) => "Please fix the form errors".to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            tracing::error!("Response decode error: {:?}", err);
            return ClientError::Decode(format!("Response decode error: {}", err));
        }
        tracing::error!("Network error: {:?}", err);
        ClientError::Network(format!("Network error: {}", err))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ClientError::Decode(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Session I/O error: {:?}", err);
        ClientError::Session(format!("Session I/O error: {}", err))
    }
}

/// Error body returned by the FarmTrack API.
///
/// The server uses `error` on most routes and `message` on the auth routes.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// Parse an error body, tolerating empty or non-JSON payloads.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// The server-provided message, if any.
    pub fn into_message(self) -> Option<String> {
        self.error
            .or(self.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

/// Convenience alias used throughout the crate.
pub type ClientResult<T> = Result<T, ClientError>;
