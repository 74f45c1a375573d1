use crate::constants::{CONFIG_FILE_NAME, CONFIG_HOME_DIR, ENV_PREFIX};
use ::config::{Config, ConfigError, File, FileFormat};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Connection settings for the object store, merged from the config file and
/// `IMGOOD_S3_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub bucket: String,
    /// Empty means the default AWS endpoint.
    pub endpoint: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    s3: StorageSettings,
}

/// Settings plus where they came from. A warning is reported instead of an
/// error when the config file is missing or unreadable.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: StorageSettings,
    pub source: Option<PathBuf>,
    pub warning: Option<String>,
}

const S3_FIELDS: [&str; 5] = ["bucket", "endpoint", "region", "access_key", "secret_key"];

/// Environment variable overriding `s3.<field>`, e.g. `IMGOOD_S3_ACCESS_KEY`.
pub fn env_var_name(field: &str) -> String {
    format!("{}_S3_{}", ENV_PREFIX, field.to_uppercase())
}

/// Config file locations searched when no explicit path is given.
pub fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".").join(CONFIG_FILE_NAME)];
    if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        paths.push(PathBuf::from(home).join(CONFIG_HOME_DIR).join(CONFIG_FILE_NAME));
    }
    paths
}

fn build(file: Option<&Path>, env: &HashMap<String, String>) -> Result<StorageSettings, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = file {
        builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
    }
    for field in S3_FIELDS {
        let value = env.get(&env_var_name(field)).cloned();
        builder = builder.set_override_option(format!("s3.{}", field), value)?;
    }

    let parsed: FileSettings = builder.build()?.try_deserialize()?;
    Ok(parsed.s3)
}

/// Merges `file` (if any) with `env`; environment values win.
pub fn resolve_settings(file: Option<&Path>, env: &HashMap<String, String>) -> LoadedSettings {
    match build(file, env) {
        Ok(settings) => LoadedSettings {
            settings,
            source: file.map(Path::to_path_buf),
            warning: None,
        },
        Err(err) => {
            let warning = match file {
                Some(path) => format!("error reading config file {}: {}", path.display(), err),
                None => format!("error reading configuration: {}", err),
            };
            let settings = if file.is_some() {
                build(None, env).unwrap_or_default()
            } else {
                StorageSettings::default()
            };
            LoadedSettings {
                settings,
                source: None,
                warning: Some(warning),
            }
        }
    }
}

/// Loads settings from `explicit` or the first default config file that exists,
/// overlaid with the process environment.
pub fn load_settings(explicit: Option<&Path>) -> LoadedSettings {
    let env: HashMap<String, String> = std::env::vars()
        .filter(|(name, _)| name.starts_with(ENV_PREFIX))
        .collect();

    let candidates = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => default_config_paths(),
    };
    let found = candidates.iter().find(|path| path.is_file());
    debug!(?candidates, ?found, "config file lookup");

    let mut loaded = resolve_settings(found.map(PathBuf::as_path), &env);
    if found.is_none() && loaded.warning.is_none() {
        let searched: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
        loaded.warning = Some(format!(
            "config file not found (searched: {})",
            searched.join(", ")
        ));
    }
    loaded
}
