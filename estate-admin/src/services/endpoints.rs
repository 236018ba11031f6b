//! Fixed backend paths. All are relative to the configured base URL.

pub const TOKEN_CREATE: &str = "/auth/jwt/create/";
pub const TOKEN_REFRESH: &str = "/auth/jwt/refresh/";
pub const TOKEN_VERIFY: &str = "/auth/jwt/verify/";
pub const CURRENT_USER: &str = "/auth/users/me/";
pub const SET_PASSWORD: &str = "/auth/users/set_password/";

pub const PROPERTIES: &str = "/properties/";

pub const ROLES: &str = "/get-roles/";
pub const ROLE_CREATE: &str = "/create-role/";
pub const ROLE_EDIT: &str = "/edit-role/";
pub const ROLE_DELETE: &str = "/delete-role/";
pub const PERMISSIONS: &str = "/get-permissions/";

pub const USERS: &str = "/users/";
pub const USER_PERMISSIONS: &str = "/user-permissions/";

pub fn role_edit(id: i64) -> String {
    format!("{}{}/", ROLE_EDIT, id)
}

pub fn role_delete(id: i64) -> String {
    format!("{}{}/", ROLE_DELETE, id)
}

pub fn role_permissions(id: i64) -> String {
    format!("/roles/{}/permissions/", id)
}

pub fn role_assign_permissions(id: i64) -> String {
    format!("/roles/{}/assign-permissions/", id)
}

pub fn user_roles(id: i64) -> String {
    format!("/user-role/{}/", id)
}

pub fn assign_role(id: i64) -> String {
    format!("/assign-role/{}/", id)
}

pub fn user_role_update(id: i64) -> String {
    format!("/user-role-update/{}/", id)
}

pub fn user_role_delete(id: i64) -> String {
    format!("/user-role-delete/{}/", id)
}
