//! Auth endpoints: login, register, logout.

use reqwest::Method;
use serde_json::json;

use crate::auth::{RefreshEndpoint, TokenRefresher};
use crate::client::ApiClient;
use crate::errors::ClientResult;
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, RegisterResponse, User};

impl ApiClient {
    /// POST /api/auth/login - Sign in and persist the session.
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<User> {
        let resp: AuthResponse = self
            .request_public(Method::POST, "/api/auth/login", Some(request))
            .await?;

        self.session()
            .sign_in(resp.user.clone(), resp.access_token, resp.refresh_token)
            .await?;
        tracing::info!("Signed in as {}", resp.user.id());
        Ok(resp.user)
    }

    /// POST /api/auth/register - Create an account; signs in when the server returns a token.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<RegisterResponse> {
        let resp: RegisterResponse = self
            .request_public(Method::POST, "/api/auth/register", Some(request))
            .await?;

        if let (Some(user), Some(token)) = (&resp.user, &resp.access_token) {
            self.session()
                .sign_in(user.clone(), token.clone(), resp.refresh_token.clone())
                .await?;
            tracing::info!("Registered and signed in as {}", user.id());
        }
        Ok(resp)
    }

    /// POST /api/auth/logout - Tell the server, then always drop the local session.
    /// An expired token is not refreshed just to sign out.
    pub async fn logout(&self) -> ClientResult<()> {
        if let Err(e) = self
            .request_once(Method::POST, "/api/auth/logout", Some(&json!({})))
            .await
        {
            tracing::error!("Logout error: {}", e);
        }
        self.session().clear().await?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// POST /api/auth/refresh-token - Explicitly refresh the access token.
    pub async fn refresh_access_token(&self) -> ClientResult<Option<String>> {
        let endpoint = RefreshEndpoint::new(
            self.http().clone(),
            self.base_url().to_string(),
            self.session().clone(),
        );
        let token = endpoint.refresh().await?;
        if let Some(token) = &token {
            self.session().set_tokens(token.clone(), None).await?;
        }
        Ok(token)
    }
}
