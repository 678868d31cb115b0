//! Authenticated request client.
//!
//! Every request carries `Authorization: Bearer <token>` when the session has
//! one. A 401 on the first attempt triggers exactly one token refresh; if that
//! yields a token the original request is replayed once with the new header.
//! If the refresh fails the session is dropped, the logout hook runs, and the
//! original 401 is returned. Any other error is returned untouched.

use std::sync::Arc;

use reqwest::{header, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::auth::{LogoutHook, RefreshEndpoint, TokenRefresher};
use crate::config::Config;
use crate::errors::{ApiErrorBody, ClientError, ClientResult};
use crate::session::SessionHandle;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

struct Inner {
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
    refresher: Arc<dyn TokenRefresher>,
    on_logout: Option<LogoutHook>,
}

/// Cheap-to-clone handle to the FarmTrack API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    config: Config,
    session: SessionHandle,
    refresher: Option<Arc<dyn TokenRefresher>>,
    on_logout: Option<LogoutHook>,
}

impl ApiClientBuilder {
    /// Override how access tokens are refreshed.
    pub fn refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Called after a failed refresh has cleared the session.
    pub fn on_logout(mut self, hook: LogoutHook) -> Self {
        self.on_logout = Some(hook);
        self
    }

    pub fn build(self) -> ClientResult<ApiClient> {
        let http = reqwest::Client::builder()
            .timeout(self.config.request_timeout)
            .cookie_store(true)
            .build()?;

        let refresher: Arc<dyn TokenRefresher> = match self.refresher {
            Some(refresher) => refresher,
            None => Arc::new(RefreshEndpoint::new(
                http.clone(),
                self.config.api_url.clone(),
                self.session.clone(),
            )),
        };

        Ok(ApiClient {
            inner: Arc::new(Inner {
                http,
                base_url: self.config.api_url,
                session: self.session,
                refresher,
                on_logout: self.on_logout,
            }),
        })
    }
}

impl ApiClient {
    pub fn builder(config: Config, session: SessionHandle) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            session,
            refresher: None,
            on_logout: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn session(&self) -> &SessionHandle {
        &self.inner.session
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    /// Authenticated request decoding a JSON response body.
    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        let resp = self.execute(method.clone(), path, body.as_ref()).await?;
        decode(&method, path, resp).await
    }

    /// Authenticated request whose response body is ignored.
    pub async fn request_empty<B>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        self.execute(method, path, body.as_ref()).await?;
        Ok(())
    }

    /// Request without the bearer token or refresh handling (login, register).
    pub async fn request_public<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        let resp = self.send_once(&method, path, body.as_ref(), None).await?;
        let resp = check_status(resp).await?;
        decode(&method, path, resp).await
    }

    /// Authenticated request that never refreshes; a 401 is returned as is.
    pub async fn request_once<B>(&self, method: Method, path: &str, body: Option<&B>) -> ClientResult<()>
    where
        B: Serialize + ?Sized,
    {
        let body = encode_body(body)?;
        let token = self.inner.session.access_token().await;
        let resp = self.send_once(&method, path, body.as_ref(), token.as_deref()).await?;
        check_status(resp).await?;
        Ok(())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request::<T, Value>(Method::GET, path, None).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.request(Method::PATCH, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.request_empty::<Value>(Method::DELETE, path, None).await
    }

    /// Send with the current token; on the first 401, refresh once and replay.
    async fn execute(&self, method: Method, path: &str, body: Option<&Value>) -> ClientResult<reqwest::Response> {
        let token = self.inner.session.access_token().await;
        let resp = self.send_once(&method, path, body, token.as_deref()).await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return check_status(resp).await;
        }

        let unauthorized = error_from_response(resp).await;
        tracing::info!("{} {} returned 401, refreshing access token", method, path);

        let refreshed = match self.inner.refresher.refresh().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::error!("Token refresh failed: no access token issued");
                self.logout_locally().await;
                return Err(unauthorized);
            }
            Err(e) => {
                tracing::error!("Token refresh failed: {}", e);
                self.logout_locally().await;
                return Err(unauthorized);
            }
        };

        if let Err(e) = self.inner.session.set_tokens(refreshed.clone(), None).await {
            tracing::warn!("Could not persist refreshed token: {}", e);
        }

        // Replayed at most once; a second 401 is returned as is.
        let retry = self.send_once(&method, path, body, Some(&refreshed)).await?;
        check_status(retry).await
    }

    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> ClientResult<reqwest::Response> {
        let url = format!("{}{}", self.inner.base_url, path);
        let request_id = Uuid::new_v4();
        tracing::debug!(request_id = %request_id, "{} {}", method, path);

        let mut builder = self
            .inner
            .http
            .request(method.clone(), &url)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .header(header::ACCEPT, "application/json");
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        Ok(builder.send().await?)
    }

    /// Drop the session after a failed refresh and notify the owner.
    async fn logout_locally(&self) {
        if let Err(e) = self.inner.session.clear().await {
            tracing::warn!("Could not clear session: {}", e);
        }
        if let Some(hook) = &self.inner.on_logout {
            hook();
        }
    }
}

fn encode_body<B: Serialize + ?Sized>(body: Option<&B>) -> ClientResult<Option<Value>> {
    body.map(serde_json::to_value).transpose().map_err(Into::into)
}

async fn check_status(resp: reqwest::Response) -> ClientResult<reqwest::Response> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(error_from_response(resp).await)
    }
}

async fn error_from_response(resp: reqwest::Response) -> ClientError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    ClientError::from_status(status, ApiErrorBody::parse(&text).into_message())
}

async fn decode<T: DeserializeOwned>(method: &Method, path: &str, resp: reqwest::Response) -> ClientResult<T> {
    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        tracing::warn!(
            "Response to {} {} does not match the expected contract: {}",
            method,
            path,
            e
        );
        ClientError::Decode(format!("Unexpected response from {} {}: {}", method, path, e))
    })
}
