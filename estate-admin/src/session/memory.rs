use super::{TokenKind, TokenStore};
use async_trait::async_trait;
use dashmap::DashMap;
use estate_core::ApiError;

/// Process-local token store. Tokens are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: DashMap<TokenKind, String>,
}

impl MemoryTokenStore {
    pub fn with_tokens(access: Option<&str>, refresh: Option<&str>) -> Self {
        let store = Self::default();
        if let Some(access) = access {
            store.tokens.insert(TokenKind::Access, access.to_string());
        }
        if let Some(refresh) = refresh {
            store.tokens.insert(TokenKind::Refresh, refresh.to_string());
        }
        store
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self, kind: TokenKind) -> Result<Option<String>, ApiError> {
        Ok(self.tokens.get(&kind).map(|entry| entry.value().clone()))
    }

    async fn save(&self, kind: TokenKind, value: &str) -> Result<(), ApiError> {
        self.tokens.insert(kind, value.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ApiError> {
        self.tokens.clear();
        Ok(())
    }
}
