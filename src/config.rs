//! Configuration loading and data directory resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Environment variable consulted when no explicit directory is given.
pub const DATA_DIR_ENV: &str = "OBSYNC_DATA";

/// File name of the shared collection store inside the data directory.
pub const STORE_FILE_NAME: &str = "obsync.db";

/// Data directory resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. `OBSYNC_DATA` environment variable
/// 3. TOML config file (`data_dir` key)
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&str>) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(path));
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(data_dir) = config.get("data_dir").and_then(|v| v.as_str()) {
                    tracing::debug!(path = %data_dir, "Data directory from config file");
                    return Ok(PathBuf::from(data_dir));
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(default_data_dir())
}

/// Full path of the shared store file under the resolved data directory.
pub fn resolve_store_path(cli_arg: Option<&str>) -> Result<PathBuf> {
    Ok(resolve_data_dir(cli_arg)?.join(STORE_FILE_NAME))
}

/// Get default configuration file path for the platform
fn locate_config_file() -> Result<PathBuf> {
    let config_path = if cfg!(target_os = "linux") {
        // Try ~/.config/obsync/config.toml first, then /etc/obsync/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("obsync").join("config.toml"));
        let system_config = PathBuf::from("/etc/obsync/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    } else {
        dirs::config_dir()
            .map(|d| d.join("obsync").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?
    };

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// Get OS-dependent default data directory path
fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/obsync (or /var/lib/obsync for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("obsync"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/obsync"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/obsync
        dirs::data_dir()
            .map(|d| d.join("obsync"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/obsync"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\obsync
        dirs::data_local_dir()
            .map(|d| d.join("obsync"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\obsync"))
    } else {
        PathBuf::from("./obsync_data")
    }
}
