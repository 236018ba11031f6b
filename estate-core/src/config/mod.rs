use crate::error::ApiError;
use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load layered settings from `directory`.
///
/// Sources, lowest precedence first: `base.yaml`, `local.yaml`, then
/// environment variables named `<PREFIX>_<SECTION>__<KEY>`. Both files are
/// optional so the binary runs on serde defaults alone.
pub fn load<T: DeserializeOwned>(directory: &Path, env_prefix: &str) -> Result<T, ApiError> {
    dotenvy::dotenv().ok();

    let settings = Config::builder()
        .add_source(File::from(directory.join("base.yaml")).required(false))
        .add_source(File::from(directory.join("local.yaml")).required(false))
        .add_source(
            Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize::<T>()?)
}
