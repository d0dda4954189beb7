use std::path::{Path, PathBuf};
use std::{env, fs};

use gyre_core::EngineConfig;

use crate::error::{ConfigError, Result};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "GYRE_CONFIG";

fn dirs_home() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// `~/.gyre/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_home().join(".gyre").join("config.toml")
}

/// Parse and validate TOML text. Missing fields take their defaults.
pub fn parse_config(text: &str) -> Result<EngineConfig> {
    let config: EngineConfig = toml::from_str(text)?;
    config.validate().map_err(ConfigError::Invalid)?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&text)?;
    tracing::info!("loaded config from {}", path.display());
    Ok(config)
}

pub fn to_toml(config: &EngineConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

pub fn save_config(path: &Path, config: &EngineConfig) -> Result<()> {
    config.validate().map_err(ConfigError::Invalid)?;
    let text = to_toml(config)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, text).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Which config file applies, in priority order:
///
/// 1. `explicit` (e.g. `--config`)
/// 2. `$GYRE_CONFIG`
/// 3. `~/.gyre/config.toml`, if it exists
///
/// `None` means built-in defaults.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }
    let default = default_config_path();
    default.is_file().then_some(default)
}

/// Load the config picked by [`resolve_config_path`], or defaults.
pub fn load_effective(explicit: Option<&Path>) -> Result<EngineConfig> {
    match resolve_config_path(explicit) {
        Some(path) => load_config(&path),
        None => {
            tracing::debug!("no config file, using defaults");
            Ok(EngineConfig::default())
        }
    }
}
