//! Session credential pair and its lifecycle.
//!
//! Tokens live in a [`TokenStore`] under two fixed keys. [`Session`] owns the
//! store and publishes lifecycle transitions so a host UI can send the
//! operator back to the login view when the session ends.

pub mod file;
pub mod memory;

use crate::config::{SessionSettings, StoreKind};
use async_trait::async_trait;
use estate_core::ApiError;
use secrecy::Secret;
use std::sync::Arc;
use tokio::sync::watch;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn key(self) -> &'static str {
        match self {
            TokenKind::Access => ACCESS_TOKEN_KEY,
            TokenKind::Refresh => REFRESH_TOKEN_KEY,
        }
    }
}

/// Persistent storage for the two session tokens.
///
/// Each key must be read and written atomically.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self, kind: TokenKind) -> Result<Option<String>, ApiError>;

    async fn save(&self, kind: TokenKind, value: &str) -> Result<(), ApiError>;

    /// Remove both tokens.
    async fn clear(&self) -> Result<(), ApiError>;

    async fn save_pair(&self, access: &str, refresh: &str) -> Result<(), ApiError> {
        self.save(TokenKind::Access, access).await?;
        self.save(TokenKind::Refresh, refresh).await
    }
}

/// Build the token store selected by `settings`.
pub fn open_store(settings: &SessionSettings) -> Arc<dyn TokenStore> {
    match settings.store {
        StoreKind::File => Arc::new(FileTokenStore::new(settings.path.clone())),
        StoreKind::Memory => Arc::new(MemoryTokenStore::default()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Tokens have not been touched since startup.
    Unknown,
    Authenticated,
    /// Both tokens were erased; the operator must log in again.
    LoggedOut,
}

pub struct Session {
    store: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self { store, state }
    }

    pub async fn access_token(&self) -> Result<Option<Secret<String>>, ApiError> {
        Ok(self.store.load(TokenKind::Access).await?.map(Secret::new))
    }

    pub async fn refresh_token(&self) -> Result<Option<Secret<String>>, ApiError> {
        Ok(self.store.load(TokenKind::Refresh).await?.map(Secret::new))
    }

    /// Persist a freshly issued pair.
    pub async fn establish(&self, access: &str, refresh: &str) -> Result<(), ApiError> {
        self.store.save_pair(access, refresh).await?;
        self.state.send_replace(SessionState::Authenticated);
        Ok(())
    }

    /// Persist a refreshed access token, and the rotated refresh token if the
    /// server issued one.
    pub async fn renew(&self, access: &str, rotated_refresh: Option<&str>) -> Result<(), ApiError> {
        match rotated_refresh {
            Some(refresh) => self.store.save_pair(access, refresh).await?,
            None => self.store.save(TokenKind::Access, access).await?,
        }
        self.state.send_replace(SessionState::Authenticated);
        Ok(())
    }

    /// Erase both tokens and move to [`SessionState::LoggedOut`].
    pub async fn terminate(&self) -> Result<(), ApiError> {
        self.store.clear().await?;
        self.state.send_replace(SessionState::LoggedOut);
        Ok(())
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}
