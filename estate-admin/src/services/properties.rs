use crate::models::Page;
use crate::services::api_client::ApiClient;
use crate::services::endpoints;
use crate::services::resource::ResourceClient;
use estate_core::ApiError;
use serde_json::Value;
use std::sync::Arc;

/// The properties registry. Records are passed through unchanged.
#[derive(Clone)]
pub struct PropertyService {
    resource: ResourceClient,
}

impl PropertyService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            resource: ResourceClient::new(client, endpoints::PROPERTIES),
        }
    }

    pub async fn list(&self) -> Result<Page<Value>, ApiError> {
        self.resource.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Value, ApiError> {
        self.resource.get(id).await
    }

    pub async fn create(&self, property: &Value) -> Result<Value, ApiError> {
        self.resource.create(property).await
    }

    pub async fn update(&self, id: i64, property: &Value) -> Result<Value, ApiError> {
        self.resource.update(id, property).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.resource.delete(id).await
    }
}
