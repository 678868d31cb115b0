//! Token refresh and logout hooks used by the request client.
//!
//! The client asks a [`TokenRefresher`] for a new access token when a request
//! comes back 401. The default refresher calls the API's refresh endpoint,
//! which authenticates with the refresh token (body and/or HTTP-only cookie).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::errors::{ApiErrorBody, ClientError};
use crate::models::RefreshResponse;
use crate::session::SessionHandle;

/// Path of the refresh endpoint, relative to the API base URL.
pub const REFRESH_PATH: &str = "/api/auth/refresh-token";

/// Obtains a fresh access token.
///
/// `Ok(None)` means the server answered but issued no token; the client treats
/// it like a failure.
#[async_trait]
pub trait TokenRefresher: Send + Sync + 'static {
    async fn refresh(&self) -> Result<Option<String>, ClientError>;
}

/// Called once when a refresh fails and the session has been dropped.
pub type LogoutHook = Arc<dyn Fn() + Send + Sync>;

/// Refreshes against `POST /api/auth/refresh-token`.
pub struct RefreshEndpoint {
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
}

impl RefreshEndpoint {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, session: SessionHandle) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            session,
        }
    }
}

#[async_trait]
impl TokenRefresher for RefreshEndpoint {
    async fn refresh(&self) -> Result<Option<String>, ClientError> {
        let url = format!("{}{}", self.base_url, REFRESH_PATH);
        let body = match self.session.refresh_token().await {
            Some(token) => json!({ "refreshToken": token }),
            None => json!({}),
        };

        // Plain client: a 401 here must not trigger another refresh.
        let resp = self.http.post(&url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ClientError::from_status(
                status,
                ApiErrorBody::parse(&text).into_message(),
            ));
        }

        let data: RefreshResponse = resp.json().await?;
        if let Some(rotated) = data.refresh_token {
            self.session.set_refresh_token(rotated).await?;
        }
        Ok(data.access_token.filter(|t| !t.is_empty()))
    }
}

/// A refresher that never yields a token; for clients without a refresh flow.
pub struct NoRefresh;

#[async_trait]
impl TokenRefresher for NoRefresh {
    async fn refresh(&self) -> Result<Option<String>, ClientError> {
        Ok(None)
    }
}
