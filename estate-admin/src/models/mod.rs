pub mod auth;
pub mod page;
pub mod role;
pub mod user;

pub use auth::{ChangePasswordRequest, LoginRequest};
pub use page::Page;
pub use role::{Permission, PermissionMatrix, Role, RoleInput};
pub use user::{
    NewUser, RoleAssignment, UserPermissions, UserProfile, UserRoles, UserUpdate,
};
