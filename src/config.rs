//! Persisted preferences: output folder, filename prefix/suffix and the
//! capture region.
//!
//! Stored as pretty-printed JSON in the platform config directory:
//!   macOS:   ~/Library/Application Support/seqshot/config.json
//!   Linux:   ~/.config/seqshot/config.json
//!   Windows: %APPDATA%/seqshot/config.json
//!
//! ```json
//! {
//!   "path": "/home/me/Screenshots",
//!   "prefix": "IMG_",
//!   "suffix": "",
//!   "region": { "left": 0, "top": 0, "width": 2560, "height": 1440 }
//! }
//! ```
//!
//! Loading never fails. A missing or unparsable file yields the defaults,
//! and every field that is absent or has the wrong type falls back on its
//! own, so a hand-edited file keeps whatever it got right.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::capture::Region;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV_VAR: &str = "SEQSHOT_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "path")]
    pub output_path: PathBuf,
    pub prefix: String,
    pub suffix: String,
    pub region: Region,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            prefix: String::new(),
            suffix: String::new(),
            region: Region::default(),
        }
    }
}

/// `<home>/Screenshots`, or `./Screenshots` when there is no home directory.
pub fn default_output_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Screenshots")
}

/// Default location of the config file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("seqshot")
        .join("config.json")
}

/// Reads the config at `path`, falling back to defaults as described in the
/// module docs.
pub fn load(path: &Path) -> Config {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            log::debug!("[CONFIG] No config at {} ({}), using defaults", path.display(), e);
            return Config::default();
        }
    };

    let value: Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("[CONFIG] Ignoring unparsable {}: {}", path.display(), e);
            return Config::default();
        }
    };

    let Some(fields) = value.as_object() else {
        log::warn!("[CONFIG] {} is not a JSON object, using defaults", path.display());
        return Config::default();
    };

    let config = from_fields(fields);
    log::info!("[CONFIG] Loaded {}", path.display());
    config
}

/// Writes `config` to `path`, replacing the previous contents.
///
/// Missing parent directories are created.
pub fn save(config: &Config, path: &Path) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(config)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, json).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("[CONFIG] Saved {}", path.display());
    Ok(())
}

fn from_fields(fields: &Map<String, Value>) -> Config {
    let defaults = Config::default();

    let region = match fields.get("region").and_then(Value::as_object) {
        Some(r) => {
            let d = defaults.region;
            Region {
                left: field(r, "left").unwrap_or(d.left),
                top: field(r, "top").unwrap_or(d.top),
                width: field(r, "width").unwrap_or(d.width),
                height: field(r, "height").unwrap_or(d.height),
            }
        }
        None => defaults.region,
    };

    Config {
        output_path: field(fields, "path").unwrap_or(defaults.output_path),
        prefix: field(fields, "prefix").unwrap_or(defaults.prefix),
        suffix: field(fields, "suffix").unwrap_or(defaults.suffix),
        region,
    }
}

/// One typed field, or `None` when it is absent or has the wrong shape.
fn field<T: DeserializeOwned>(fields: &Map<String, Value>, key: &str) -> Option<T> {
    let value = fields.get(key)?;
    match T::deserialize(value) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("[CONFIG] Ignoring malformed field '{}': {}", key, e);
            None
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error writing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
}
