use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use estate_admin::config::{get_configuration, Settings};
use estate_admin::models::{NewUser, RoleAssignment, RoleInput, UserUpdate};
use estate_admin::navigation;
use estate_admin::services::{MasterTable, MultipartForm, ResourceClient};
use estate_admin::session::SessionState;
use estate_admin::utils::decode_claims;
use estate_admin::AppState;
use estate_core::observability::{init_tracing, shutdown_tracing, TracingOptions};
use estate_core::ApiError;
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "estate-admin", version, about = "Property back-office administration")]
struct Cli {
    /// Backend root URL. Overrides `api.base_url`.
    #[arg(long, global = true, env = "ESTATE_API__BASE_URL")]
    base_url: Option<String>,

    /// Token file. Overrides `session.path`.
    #[arg(long, global = true, env = "ESTATE_SESSION__PATH")]
    session_path: Option<PathBuf>,

    /// Emit logs as JSON on stderr.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the token pair.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ESTATE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Erase the stored tokens.
    Logout,
    /// Verify the stored session, refreshing once if needed.
    Status,
    /// Exchange the refresh token for a new access token.
    Refresh,
    /// The signed-in operator's profile.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// The navigation menu visible to the signed-in operator.
    Menu,
    /// Master-data tables.
    Master {
        #[arg(value_enum)]
        table: MasterTable,
        #[command(subcommand)]
        action: CrudCommand,
    },
    /// The properties registry.
    #[command(subcommand)]
    Properties(CrudCommand),
    #[command(subcommand)]
    Roles(RoleCommand),
    #[command(subcommand)]
    Permissions(PermissionCommand),
    #[command(subcommand)]
    Users(UserCommand),
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    Show,
    /// Update profile fields, optionally uploading files.
    Update {
        /// `name=value`, repeatable.
        #[arg(long = "field", value_parser = parse_key_value)]
        fields: Vec<(String, String)>,
        /// `name=path`, repeatable.
        #[arg(long = "file", value_parser = parse_key_value)]
        files: Vec<(String, String)>,
    },
    ChangePassword {
        #[arg(long, env = "ESTATE_CURRENT_PASSWORD", hide_env_values = true)]
        current: String,
        #[arg(long, env = "ESTATE_NEW_PASSWORD", hide_env_values = true)]
        new: String,
    },
}

#[derive(Args, Debug)]
struct DataArg {
    /// JSON object, or `@path` to read it from a file.
    #[arg(long)]
    data: String,
}

#[derive(Subcommand, Debug)]
enum CrudCommand {
    List,
    Get { id: i64 },
    Create(DataArg),
    Update {
        id: i64,
        #[command(flatten)]
        data: DataArg,
    },
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
enum RoleCommand {
    List,
    Get { id: i64 },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long = "permission")]
        permissions: Vec<i64>,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long = "permission")]
        permissions: Vec<i64>,
    },
    Delete { id: i64 },
    /// Permissions currently granted to a role.
    Permissions { id: i64 },
    /// Replace the permissions granted to a role.
    AssignPermissions {
        id: i64,
        #[arg(long = "permission", required = true)]
        permissions: Vec<i64>,
    },
}

#[derive(Subcommand, Debug)]
enum PermissionCommand {
    List,
    /// Permissions grouped by model and action.
    Matrix,
    /// Permission codenames held by the signed-in operator.
    Mine,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    List,
    Get { id: i64 },
    Create(DataArg),
    Update {
        id: i64,
        #[command(flatten)]
        data: DataArg,
    },
    Delete { id: i64 },
    /// Role names a user belongs to.
    Roles { id: i64 },
    /// Assign one role (`--role 3`) or several (`--role 1 --role 2`).
    AssignRoles {
        id: i64,
        #[arg(long = "role", required = true)]
        roles: Vec<i64>,
    },
    UpdateRoles {
        id: i64,
        #[command(flatten)]
        data: DataArg,
    },
    DeleteRoles { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = get_configuration().context("Failed to read configuration")?;
    apply_overrides(&mut settings, &cli);

    init_tracing(TracingOptions {
        service_name: "estate-admin",
        log_level: &settings.telemetry.log_level,
        otlp_endpoint: settings.telemetry.otlp_endpoint.as_deref(),
        json: cli.json_logs,
    })?;

    let state = AppState::from_settings(&settings)?;
    let session_events = state.session.subscribe();
    let explicit_logout = matches!(cli.command, Command::Logout);

    let result = run(&state, cli.command).await;

    if !explicit_logout && *session_events.borrow() == SessionState::LoggedOut {
        eprintln!("Session ended. Run `estate-admin login` to sign in again.");
    }
    shutdown_tracing();

    match result {
        Ok(output) => {
            print_json(&output)?;
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            Err(anyhow::anyhow!(e.detail()))
        }
    }
}

fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(base_url) = &cli.base_url {
        settings.api.base_url = base_url.trim_end_matches('/').to_string();
    }
    if let Some(path) = &cli.session_path {
        settings.session.path = path.clone();
    }
}

async fn run(state: &AppState, command: Command) -> Result<Value, ApiError> {
    match command {
        Command::Login { email, password } => to_value(state.auth.login(&email, &password).await?),
        Command::Logout => {
            state.auth.logout().await?;
            Ok(json!({"logged_out": true}))
        }
        Command::Status => status(state).await,
        Command::Refresh => {
            let renewed = state.auth.refresh().await?;
            Ok(json!({"refreshed": renewed.is_some()}))
        }
        Command::Profile(command) => profile(state, command).await,
        Command::Menu => {
            let permissions = state.users.permissions().await?;
            to_value(navigation::navigation_for(&permissions))
        }
        Command::Master { table, action } => crud(&state.master_data.table(table), action).await,
        Command::Properties(action) => match action {
            CrudCommand::List => to_value(state.properties.list().await?),
            CrudCommand::Get { id } => state.properties.get(id).await,
            CrudCommand::Create(data) => state.properties.create(&read_data(&data)?).await,
            CrudCommand::Update { id, data } => {
                state.properties.update(id, &read_data(&data)?).await
            }
            CrudCommand::Delete { id } => {
                state.properties.delete(id).await?;
                Ok(json!({"deleted": id}))
            }
        },
        Command::Roles(command) => roles(state, command).await,
        Command::Permissions(command) => match command {
            PermissionCommand::List => to_value(state.permissions.list().await?),
            PermissionCommand::Matrix => to_value(state.permissions.matrix().await?),
            PermissionCommand::Mine => to_value(state.users.permissions().await?),
        },
        Command::Users(command) => users(state, command).await,
    }
}

async fn status(state: &AppState) -> Result<Value, ApiError> {
    let authenticated = state.auth.is_authenticated().await?;
    let expires_at = match state.session.access_token().await? {
        Some(token) => decode_claims(token.expose_secret())
            .ok()
            .and_then(|claims| claims.expires_at()),
        None => None,
    };
    Ok(json!({
        "authenticated": authenticated,
        "access_token_expires_at": expires_at,
    }))
}

async fn profile(state: &AppState, command: ProfileCommand) -> Result<Value, ApiError> {
    match command {
        ProfileCommand::Show => to_value(state.auth.profile().await?),
        ProfileCommand::Update { fields, files } => {
            let mut form = MultipartForm::new();
            for (name, value) in fields {
                form = form.text(name, value);
            }
            for (name, path) in files {
                let path = PathBuf::from(path);
                let bytes = tokio::fs::read(&path).await.map_err(|e| {
                    ApiError::Input(format!("Failed to read {}: {}", path.display(), e))
                })?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| name.clone());
                form = form.file(name, file_name, mime_for(&path), bytes);
            }
            to_value(state.auth.update_profile(form).await?)
        }
        ProfileCommand::ChangePassword { current, new } => {
            state.auth.change_password(&current, &new).await
        }
    }
}

async fn crud(resource: &ResourceClient, action: CrudCommand) -> Result<Value, ApiError> {
    match action {
        CrudCommand::List => to_value(resource.list::<Value>().await?),
        CrudCommand::Get { id } => resource.get(id).await,
        CrudCommand::Create(data) => resource.create(&read_data(&data)?).await,
        CrudCommand::Update { id, data } => resource.update(id, &read_data(&data)?).await,
        CrudCommand::Delete { id } => {
            resource.delete(id).await?;
            Ok(json!({"deleted": id}))
        }
    }
}

async fn roles(state: &AppState, command: RoleCommand) -> Result<Value, ApiError> {
    match command {
        RoleCommand::List => to_value(state.roles.list().await?),
        RoleCommand::Get { id } => to_value(state.roles.get(id).await?),
        RoleCommand::Create { name, permissions } => {
            to_value(state.roles.create(&RoleInput { name, permissions }).await?)
        }
        RoleCommand::Update {
            id,
            name,
            permissions,
        } => to_value(state.roles.update(id, &RoleInput { name, permissions }).await?),
        RoleCommand::Delete { id } => {
            state.roles.delete(id).await?;
            Ok(json!({"deleted": id}))
        }
        RoleCommand::Permissions { id } => state.permissions.role_permissions(id).await,
        RoleCommand::AssignPermissions { id, permissions } => {
            state.permissions.assign_to_role(id, &permissions).await
        }
    }
}

async fn users(state: &AppState, command: UserCommand) -> Result<Value, ApiError> {
    match command {
        UserCommand::List => to_value(state.users.list().await?),
        UserCommand::Get { id } => state.users.get(id).await,
        UserCommand::Create(data) => {
            let user: NewUser = serde_json::from_value(read_data(&data)?)?;
            state.users.create(&user).await
        }
        UserCommand::Update { id, data } => {
            let update: UserUpdate = serde_json::from_value(read_data(&data)?)?;
            state.users.update(id, &update).await
        }
        UserCommand::Delete { id } => {
            state.users.delete(id).await?;
            Ok(json!({"deleted": id}))
        }
        UserCommand::Roles { id } => to_value(state.users.roles(id).await?),
        UserCommand::AssignRoles { id, mut roles } => {
            let assignment = if roles.len() == 1 {
                RoleAssignment::Single(roles.remove(0))
            } else {
                RoleAssignment::Many(roles)
            };
            state.users.assign_roles(id, assignment).await
        }
        UserCommand::UpdateRoles { id, data } => {
            state.users.update_roles(id, &read_data(&data)?).await
        }
        UserCommand::DeleteRoles { id } => state.users.delete_roles(id).await,
    }
}

fn to_value<T: Serialize>(value: T) -> Result<Value, ApiError> {
    Ok(serde_json::to_value(value)?)
}

fn read_data(arg: &DataArg) -> Result<Value, ApiError> {
    let raw = match arg.data.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| ApiError::Input(format!("Failed to read {}: {}", path, e)))?,
        None => arg.data.clone(),
    };
    serde_json::from_str(&raw)
        .map_err(|e| ApiError::Input(format!("--data is not valid JSON: {}", e)))
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
