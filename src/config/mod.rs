//! Configuration module for the FarmTrack client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ClientError;

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://farmtrack-api.onrender.com";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the FarmTrack API, without trailing slash
    pub api_url: String,
    /// Path of the persisted session file
    pub session_path: PathBuf,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let api_url = normalize_base_url(
            &env::var("FARMTRACK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        );

        let session_path = env::var("FARMTRACK_SESSION_PATH")
            .unwrap_or_else(|_| "./data/session.json".to_string())
            .into();

        let timeout_secs = match env::var("FARMTRACK_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ClientError::Config(format!(
                    "Invalid FARMTRACK_REQUEST_TIMEOUT_SECS value: {}",
                    raw
                ))
            })?,
            Err(_) => 30,
        };

        let log_level = env::var("FARMTRACK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("FARMTRACK_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("text") | Err(_) => LogFormat::Text,
            Ok(other) => {
                return Err(ClientError::Config(format!(
                    "Invalid FARMTRACK_LOG_FORMAT value: {}",
                    other
                )))
            }
        };

        Ok(Self {
            api_url,
            session_path,
            request_timeout: Duration::from_secs(timeout_secs),
            log_level,
            log_format,
        })
    }

    /// Configuration pointing at an explicit base URL, other fields defaulted.
    pub fn with_api_url(api_url: &str, session_path: impl Into<PathBuf>) -> Self {
        Self {
            api_url: normalize_base_url(api_url),
            session_path: session_path.into(),
            request_timeout: Duration::from_secs(30),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
