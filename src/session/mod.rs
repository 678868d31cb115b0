//! Session persistence.
//!
//! The session (current user, access token, refresh token) is an explicit
//! object: loaded once at process start, saved on login and token refresh,
//! and cleared on logout. The on-disk form is a small JSON file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::errors::ClientError;
use crate::models::User;

/// Credentials and profile of the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.access_token.is_some()
    }
}

/// JSON file backing a [`Session`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session; a missing file is an empty session.
    pub async fn load(&self) -> Result<Session, ClientError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Session::default()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                ClientError::Session(format!(
                    "Corrupt session file {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Session::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the session, creating the parent directory if needed.
    pub async fn save(&self, session: &Session) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let raw = serde_json::to_string_pretty(session)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }

    /// Remove the stored session. Already-absent is not an error.
    pub async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Shared, persisted session injected into the request client.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    state: Arc<RwLock<Session>>,
    store: Option<SessionStore>,
}

impl SessionHandle {
    /// Load the session from `store` and keep it in sync from now on.
    pub async fn load(store: SessionStore) -> Result<Self, ClientError> {
        let session = store.load().await?;
        tracing::debug!(
            "Loaded session from {} (authenticated: {})",
            store.path().display(),
            session.is_authenticated()
        );
        Ok(Self {
            state: Arc::new(RwLock::new(session)),
            store: Some(store),
        })
    }

    /// A session that only lives in memory.
    pub fn in_memory(session: Session) -> Self {
        Self {
            state: Arc::new(RwLock::new(session)),
            store: None,
        }
    }

    pub async fn snapshot(&self) -> Session {
        self.state.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.state.read().await.refresh_token.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    /// Replace the whole session after a login.
    pub async fn sign_in(
        &self,
        user: User,
        access_token: String,
        refresh_token: Option<String>,
    ) -> Result<(), ClientError> {
        let mut guard = self.state.write().await;
        *guard = Session {
            user: Some(user),
            access_token: Some(access_token),
            refresh_token,
        };
        self.persist(&guard).await
    }

    /// Store a refreshed access token (and rotated refresh token, if any).
    pub async fn set_tokens(
        &self,
        access_token: String,
        refresh_token: Option<String>,
    ) -> Result<(), ClientError> {
        let mut guard = self.state.write().await;
        guard.access_token = Some(access_token);
        if refresh_token.is_some() {
            guard.refresh_token = refresh_token;
        }
        self.persist(&guard).await
    }

    /// Store a rotated refresh token.
    pub async fn set_refresh_token(&self, refresh_token: String) -> Result<(), ClientError> {
        let mut guard = self.state.write().await;
        guard.refresh_token = Some(refresh_token);
        self.persist(&guard).await
    }

    /// Forget the user and tokens, in memory and on disk.
    pub async fn clear(&self) -> Result<(), ClientError> {
        let mut guard = self.state.write().await;
        *guard = Session::default();
        match &self.store {
            Some(store) => store.clear().await,
            None => Ok(()),
        }
    }

    async fn persist(&self, session: &Session) -> Result<(), ClientError> {
        match &self.store {
            Some(store) => store.save(session).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user() -> User {
        serde_json::from_value(serde_json::json!({"id": "u1", "firstname": "Amina"})).unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_session() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("nope.json"));
        let session = store.load().await.unwrap();
        assert_eq!(session, Session::default());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_in_persists_and_clear_removes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let handle = SessionHandle::load(SessionStore::new(&path)).await.unwrap();

        handle
            .sign_in(user(), "access-1".into(), Some("refresh-1".into()))
            .await
            .unwrap();
        assert!(path.exists());

        let reloaded = SessionStore::new(&path).load().await.unwrap();
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.access_token.as_deref(), Some("access-1"));

        handle.set_tokens("access-2".into(), None).await.unwrap();
        let reloaded = SessionStore::new(&path).load().await.unwrap();
        assert_eq!(reloaded.access_token.as_deref(), Some("access-2"));
        assert_eq!(reloaded.refresh_token.as_deref(), Some("refresh-1"));

        handle.clear().await.unwrap();
        assert!(!path.exists());
        assert_eq!(handle.snapshot().await, Session::default());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_session_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        tokio::fs::write(&path, "{not json").await.unwrap();
        let err = SessionStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, ClientError::Session(_)));
    }
}
