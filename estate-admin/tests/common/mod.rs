#![allow(dead_code)]

use estate_admin::config::{ApiSettings, Settings};
use estate_admin::session::{MemoryTokenStore, TokenKind, TokenStore};
use estate_admin::AppState;
use std::sync::Arc;
use wiremock::MockServer;

pub const REFRESH_PATH: &str = "/auth/jwt/refresh/";
pub const VERIFY_PATH: &str = "/auth/jwt/verify/";
pub const LOGIN_PATH: &str = "/auth/jwt/create/";
pub const ME_PATH: &str = "/auth/users/me/";

pub struct TestApp {
    pub server: MockServer,
    pub store: Arc<MemoryTokenStore>,
    pub state: AppState,
}

impl TestApp {
    pub async fn access_token(&self) -> Option<String> {
        self.store.load(TokenKind::Access).await.unwrap()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.store.load(TokenKind::Refresh).await.unwrap()
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}

/// Start a mock backend and an app whose token store holds the given tokens.
pub async fn spawn_app(access: Option<&str>, refresh: Option<&str>) -> TestApp {
    let server = MockServer::start().await;
    let store = Arc::new(MemoryTokenStore::with_tokens(access, refresh));

    let settings = Settings {
        api: ApiSettings {
            base_url: server.uri(),
            timeout_secs: 5,
        },
        ..Settings::default()
    };
    let state = AppState::new(&settings, store.clone()).expect("Failed to build app state");

    TestApp {
        server,
        store,
        state,
    }
}
