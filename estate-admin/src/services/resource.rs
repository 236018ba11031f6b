//! CRUD over one REST collection: `/{resource}/` and `/{resource}/{id}/`.

use crate::models::Page;
use crate::services::api_client::ApiClient;
use estate_core::ApiError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct ResourceClient {
    client: Arc<ApiClient>,
    collection: &'static str,
}

impl ResourceClient {
    /// `collection` must start and end with `/`, e.g. `/countries/`.
    pub fn new(client: Arc<ApiClient>, collection: &'static str) -> Self {
        Self { client, collection }
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    pub fn item_path(&self, id: i64) -> String {
        format!("{}{}/", self.collection, id)
    }

    pub async fn list<T: DeserializeOwned>(&self) -> Result<Page<T>, ApiError> {
        self.client.get(self.collection).await
    }

    pub async fn get<T: DeserializeOwned>(&self, id: i64) -> Result<T, ApiError> {
        self.client.get(&self.item_path(id)).await
    }

    pub async fn create<T, B>(&self, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let created = self.client.post(self.collection, body).await?;
        tracing::info!(collection = self.collection, "Record created");
        Ok(created)
    }

    pub async fn update<T, B>(&self, id: i64, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let updated = self.client.put(&self.item_path(id), body).await?;
        tracing::info!(collection = self.collection, id, "Record updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&self.item_path(id)).await?;
        tracing::info!(collection = self.collection, id, "Record deleted");
        Ok(())
    }
}
