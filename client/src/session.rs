//! Persistent storage for the session bearer token.
//!
//! The API client receives a [`SessionStore`] at construction time and reads
//! the token before every request. Writing the token (after login) and
//! clearing it (on logout) is left to the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

/// Key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session file {path} is malformed: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("session lock poisoned")]
    Poisoned,
}

/// Source of the bearer token attached to outgoing requests.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current token, or `None` when no session is active.
    async fn token(&self) -> Result<Option<String>, SessionError>;

    /// Persist a new token, replacing any previous one.
    async fn store_token(&self, token: &str) -> Result<(), SessionError>;

    /// Forget the current token.
    async fn clear(&self) -> Result<(), SessionError>;
}

fn non_empty(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

/// In-process token holder. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: RwLock<Option<String>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(non_empty(Some(token.into()))),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn token(&self) -> Result<Option<String>, SessionError> {
        let guard = self.token.read().map_err(|_| SessionError::Poisoned)?;
        Ok(guard.clone())
    }

    async fn store_token(&self, token: &str) -> Result<(), SessionError> {
        let mut guard = self.token.write().map_err(|_| SessionError::Poisoned)?;
        *guard = non_empty(Some(token.to_string()));
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.token.write().map_err(|_| SessionError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// JSON file backed store: `{ "token": "<bearer token>" }`.
///
/// A missing file is an empty session.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }

    async fn read_file(&self) -> Result<SessionFile, SessionError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionFile::default())
            }
            Err(err) => return Err(self.io_error(err)),
        };

        serde_json::from_slice(&raw).map_err(|source| SessionError::Format {
            path: self.path.clone(),
            source,
        })
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(non_empty(self.read_file().await?.token))
    }

    async fn store_token(&self, token: &str) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| self.io_error(err))?;
        }

        let file = SessionFile {
            token: non_empty(Some(token.to_string())),
        };
        let body = serde_json::to_vec_pretty(&file).map_err(|source| SessionError::Format {
            path: self.path.clone(),
            source,
        })?;

        tokio::fs::write(&self.path, body)
            .await
            .map_err(|err| self.io_error(err))?;
        tracing::debug!(path = %self.path.display(), key = TOKEN_KEY, "session token stored");
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "session cleared");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}
