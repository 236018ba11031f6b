pub mod api_client;
pub mod auth;
pub mod endpoints;
pub mod master_data;
pub mod metrics;
pub mod properties;
pub mod request;
pub mod resource;
pub mod roles;
pub mod users;

pub use api_client::ApiClient;
pub use auth::AuthService;
pub use master_data::{MasterDataService, MasterTable};
pub use properties::PropertyService;
pub use request::{MultipartForm, PendingRequest, RequestBody};
pub use resource::ResourceClient;
pub use roles::{PermissionService, RoleService};
pub use users::UserService;
