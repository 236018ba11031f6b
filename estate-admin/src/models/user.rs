use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use validator::Validate;

/// The signed-in operator, from `/auth/users/me/`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return full;
        }
        match self.username.as_deref() {
            Some(username) if !username.is_empty() => username.to_string(),
            _ => self.email.split('@').next().unwrap_or("User").to_string(),
        }
    }

    pub fn initials(&self) -> String {
        let initials: String = self
            .name()
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase();
        if initials.is_empty() {
            "U".to_string()
        } else {
            initials
        }
    }
}

/// Payload for `POST /users/`.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct NewUser {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_joined: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// Payload for `PUT /users/{id}/`. A blank password is not sent, so the
/// stored password is left alone.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct UserUpdate {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub password: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
}

fn is_blank(password: &Option<String>) -> bool {
    password.as_deref().map_or(true, |p| p.trim().is_empty())
}

/// Names of the groups (roles) a user belongs to.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UserRoles {
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Body for `PATCH /assign-role/{id}/`. One id is sent as `role_id`,
/// several as `role_ids`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleAssignment {
    Single(i64),
    Many(Vec<i64>),
}

impl From<i64> for RoleAssignment {
    fn from(id: i64) -> Self {
        RoleAssignment::Single(id)
    }
}

impl From<Vec<i64>> for RoleAssignment {
    fn from(ids: Vec<i64>) -> Self {
        RoleAssignment::Many(ids)
    }
}

impl Serialize for RoleAssignment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct SingleBody {
            role_id: i64,
        }

        #[derive(Serialize)]
        struct ManyBody<'a> {
            role_ids: &'a [i64],
        }

        match self {
            RoleAssignment::Single(role_id) => SingleBody { role_id: *role_id }.serialize(serializer),
            RoleAssignment::Many(role_ids) => ManyBody { role_ids }.serialize(serializer),
        }
    }
}

/// Answer of `/user-permissions/`: either a bare list of codenames or
/// `{"permissions": [...]}`.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum UserPermissions {
    Wrapped { permissions: Vec<String> },
    Plain(Vec<String>),
}

impl UserPermissions {
    pub fn into_codenames(self) -> Vec<String> {
        match self {
            UserPermissions::Wrapped { permissions } | UserPermissions::Plain(permissions) => {
                permissions
            }
        }
    }
}
