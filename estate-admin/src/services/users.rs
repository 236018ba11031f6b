use crate::models::{NewUser, Page, RoleAssignment, UserPermissions, UserRoles, UserUpdate};
use crate::services::api_client::ApiClient;
use crate::services::endpoints;
use crate::services::resource::ResourceClient;
use estate_core::ApiError;
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

#[derive(Clone)]
pub struct UserService {
    client: Arc<ApiClient>,
    users: ResourceClient,
}

impl UserService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            users: ResourceClient::new(client.clone(), endpoints::USERS),
            client,
        }
    }

    pub async fn list(&self) -> Result<Page<Value>, ApiError> {
        self.users.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Value, ApiError> {
        self.users.get(id).await
    }

    pub async fn create(&self, user: &NewUser) -> Result<Value, ApiError> {
        user.validate()?;
        self.users.create(user).await
    }

    /// A blank password in `update` leaves the stored password untouched.
    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<Value, ApiError> {
        update.validate()?;
        self.users.update(id, update).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.users.delete(id).await
    }

    pub async fn roles(&self, id: i64) -> Result<UserRoles, ApiError> {
        self.client.get(&endpoints::user_roles(id)).await
    }

    pub async fn assign_roles(
        &self,
        id: i64,
        assignment: impl Into<RoleAssignment>,
    ) -> Result<Value, ApiError> {
        let assignment = assignment.into();
        let result = self
            .client
            .patch(&endpoints::assign_role(id), &assignment)
            .await?;
        tracing::info!(user_id = id, ?assignment, "Roles assigned");
        Ok(result)
    }

    pub async fn update_roles(&self, id: i64, roles: &Value) -> Result<Value, ApiError> {
        self.client.put(&endpoints::user_role_update(id), roles).await
    }

    pub async fn delete_roles(&self, id: i64) -> Result<Value, ApiError> {
        let result = self.client.delete(&endpoints::user_role_delete(id)).await?;
        tracing::info!(user_id = id, "User roles removed");
        Ok(result)
    }

    /// Permission codenames of the signed-in operator, used to build the menu.
    pub async fn permissions(&self) -> Result<Vec<String>, ApiError> {
        let permissions: UserPermissions = self.client.get(endpoints::USER_PERMISSIONS).await?;
        Ok(permissions.into_codenames())
    }
}
