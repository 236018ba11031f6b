//! Token store persisted as a small JSON document on disk.
//!
//! Layout: `{"access_token": "...", "refresh_token": "..."}`. Writes go to a
//! sibling temp file that is renamed over the target, so readers never see a
//! partial document.

use super::{TokenKind, TokenStore};
use async_trait::async_trait;
use estate_core::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredTokens {
    #[serde(rename = "access_token", default, skip_serializing_if = "Option::is_none")]
    access: Option<String>,
    #[serde(rename = "refresh_token", default, skip_serializing_if = "Option::is_none")]
    refresh: Option<String>,
}

impl StoredTokens {
    fn slot(&mut self, kind: TokenKind) -> &mut Option<String> {
        match kind {
            TokenKind::Access => &mut self.access,
            TokenKind::Refresh => &mut self.refresh,
        }
    }
}

#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<StoredTokens, ApiError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(StoredTokens::default()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                tracing::error!(path = %self.path.display(), error = %e, "Session file is corrupt");
                ApiError::Storage(anyhow::anyhow!(
                    "Failed to parse session file {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoredTokens::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, tokens: &StoredTokens) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(tokens)?).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)).await?;
        }

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self, kind: TokenKind) -> Result<Option<String>, ApiError> {
        let mut tokens = self.read().await?;
        Ok(tokens.slot(kind).take())
    }

    async fn save(&self, kind: TokenKind, value: &str) -> Result<(), ApiError> {
        let _guard = self.write_lock.lock().await;
        let mut tokens = self.read().await?;
        *tokens.slot(kind) = Some(value.to_string());
        self.write(&tokens).await
    }

    async fn save_pair(&self, access: &str, refresh: &str) -> Result<(), ApiError> {
        let _guard = self.write_lock.lock().await;
        let tokens = StoredTokens {
            access: Some(access.to_string()),
            refresh: Some(refresh.to_string()),
        };
        self.write(&tokens).await
    }

    async fn clear(&self) -> Result<(), ApiError> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
