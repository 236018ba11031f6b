use crate::models::role::AssignPermissions;
use crate::models::{Page, Permission, PermissionMatrix, Role, RoleInput};
use crate::services::api_client::ApiClient;
use crate::services::endpoints;
use estate_core::ApiError;
use serde_json::Value;
use std::sync::Arc;
use validator::Validate;

#[derive(Clone)]
pub struct RoleService {
    client: Arc<ApiClient>,
}

impl RoleService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Role>, ApiError> {
        let page: Page<Role> = self.client.get(endpoints::ROLES).await?;
        Ok(page.into_results())
    }

    pub async fn get(&self, id: i64) -> Result<Role, ApiError> {
        self.client.get(&endpoints::role_edit(id)).await
    }

    pub async fn create(&self, input: &RoleInput) -> Result<Role, ApiError> {
        input.validate()?;
        let role: Role = self.client.post(endpoints::ROLE_CREATE, input).await?;
        tracing::info!(role_id = role.id, name = %role.name, "Role created");
        Ok(role)
    }

    pub async fn update(&self, id: i64, input: &RoleInput) -> Result<Role, ApiError> {
        input.validate()?;
        let role: Role = self.client.put(&endpoints::role_edit(id), input).await?;
        tracing::info!(role_id = id, "Role updated");
        Ok(role)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&endpoints::role_delete(id)).await?;
        tracing::info!(role_id = id, "Role deleted");
        Ok(())
    }
}

#[derive(Clone)]
pub struct PermissionService {
    client: Arc<ApiClient>,
}

impl PermissionService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Permission>, ApiError> {
        let page: Page<Permission> = self.client.get(endpoints::PERMISSIONS).await?;
        Ok(page.into_results())
    }

    /// All permissions laid out by model and action for the role editor.
    pub async fn matrix(&self) -> Result<PermissionMatrix, ApiError> {
        Ok(PermissionMatrix::from_permissions(&self.list().await?))
    }

    pub async fn role_permissions(&self, role_id: i64) -> Result<Value, ApiError> {
        self.client.get(&endpoints::role_permissions(role_id)).await
    }

    /// Replace the permissions granted to a role.
    pub async fn assign_to_role(
        &self,
        role_id: i64,
        permission_ids: &[i64],
    ) -> Result<Value, ApiError> {
        let result = self
            .client
            .post(
                &endpoints::role_assign_permissions(role_id),
                &AssignPermissions {
                    permissions: permission_ids,
                },
            )
            .await?;
        tracing::info!(role_id, count = permission_ids.len(), "Permissions assigned");
        Ok(result)
    }
}
