use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    pub id: i64,
    pub name: String,
    /// Permission ids granted to this role.
    #[serde(default)]
    pub permissions: Vec<i64>,
}

/// Payload for role create and update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RoleInput {
    #[validate(length(min = 1, message = "Role name is required"))]
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    pub id: i64,
    pub name: String,
    pub codename: String,
    #[serde(rename = "content_type__model", default)]
    pub model: String,
}

impl Permission {
    /// Codename prefix: `add`, `change`, `delete` or `view`.
    pub fn action(&self) -> &str {
        self.codename.split('_').next().unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct AssignPermissions<'a> {
    pub permissions: &'a [i64],
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PermissionCell {
    pub id: i64,
    pub label: String,
}

/// Permissions grouped by model, then by action, as the role editor shows them.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PermissionMatrix(BTreeMap<String, BTreeMap<String, PermissionCell>>);

impl PermissionMatrix {
    pub fn from_permissions(permissions: &[Permission]) -> Self {
        let mut matrix: BTreeMap<String, BTreeMap<String, PermissionCell>> = BTreeMap::new();
        for permission in permissions {
            matrix.entry(permission.model.clone()).or_default().insert(
                permission.action().to_string(),
                PermissionCell {
                    id: permission.id,
                    label: permission.name.clone(),
                },
            );
        }
        Self(matrix)
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn actions(&self, model: &str) -> Option<&BTreeMap<String, PermissionCell>> {
        self.0.get(model)
    }

    /// Every permission id under `model` ("select all" for one row).
    pub fn ids_for_model(&self, model: &str) -> Vec<i64> {
        self.0
            .get(model)
            .map(|actions| actions.values().map(|cell| cell.id).collect())
            .unwrap_or_default()
    }

    /// Whether `selected` covers every action of `model`.
    pub fn is_model_fully_selected(&self, model: &str, selected: &[i64]) -> bool {
        match self.0.get(model) {
            Some(actions) => actions.values().all(|cell| selected.contains(&cell.id)),
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
