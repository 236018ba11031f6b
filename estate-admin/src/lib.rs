pub mod config;
pub mod models;
pub mod navigation;
pub mod services;
pub mod session;
pub mod utils;

use config::Settings;
use estate_core::ApiError;
use services::{
    ApiClient, AuthService, MasterDataService, PermissionService, PropertyService, RoleService,
    UserService,
};
use session::{Session, TokenStore};
use std::sync::Arc;

/// Every service, wired to one session and one authenticated client.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Session>,
    pub client: Arc<ApiClient>,
    pub auth: AuthService,
    pub master_data: MasterDataService,
    pub properties: PropertyService,
    pub roles: RoleService,
    pub permissions: PermissionService,
    pub users: UserService,
}

impl AppState {
    pub fn new(settings: &Settings, store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let session = Arc::new(Session::new(store));
        let client = Arc::new(ApiClient::new(&settings.api, session.clone())?);

        Ok(Self {
            auth: AuthService::new(client.clone()),
            master_data: MasterDataService::new(client.clone()),
            properties: PropertyService::new(client.clone()),
            roles: RoleService::new(client.clone()),
            permissions: PermissionService::new(client.clone()),
            users: UserService::new(client.clone()),
            session,
            client,
        })
    }

    /// Build from settings, using the configured token store.
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Self::new(settings, session::open_store(&settings.session))
    }
}
