use estate_core::ApiError;
use serde::Deserialize;
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "ESTATE";

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiSettings {
    /// Backend root, e.g. `https://estate.example.com/api`. Paths are appended verbatim.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    File,
    Memory,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SessionSettings {
    #[serde(default)]
    pub store: StoreKind,
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            store: StoreKind::default(),
            path: default_session_path(),
        }
    }
}

fn default_session_path() -> PathBuf {
    PathBuf::from(".estate-admin").join("session.json")
}

#[derive(Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Directory holding `base.yaml` / `local.yaml`.
///
/// `ESTATE_CONFIG_DIR` wins; otherwise `./config`, or `./estate-admin/config`
/// when run from the workspace root.
pub fn configuration_directory() -> PathBuf {
    if let Ok(dir) = std::env::var("ESTATE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    let base_path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let workspace_config = base_path.join("estate-admin").join("config");
    if !base_path.ends_with("estate-admin") && workspace_config.is_dir() {
        workspace_config
    } else {
        base_path.join("config")
    }
}

pub fn get_configuration() -> Result<Settings, ApiError> {
    let mut settings: Settings =
        estate_core::config::load(&configuration_directory(), ENV_PREFIX)?;
    settings.api.base_url = settings.api.base_url.trim_end_matches('/').to_string();
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api.timeout_secs, 30);
        assert_eq!(settings.session.store, StoreKind::File);
        assert!(settings.session.path.ends_with("session.json"));
        assert_eq!(settings.telemetry.log_level, "info");
        assert!(settings.telemetry.otlp_endpoint.is_none());
    }

    #[test]
    fn test_store_kind_deserializes_lowercase() {
        let kind: StoreKind = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(kind, StoreKind::Memory);
    }
}
