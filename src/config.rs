//! User configuration
//!
//! Read from `config.toml` in the platform config directory
//! (e.g. `~/.config/recall/config.toml`). Every key is optional:
//!
//! ```toml
//! [storage]
//! database_path = "/home/me/recall/questions.db"
//!
//! [review]
//! session_limit = 30
//!
//! [import]
//! default_source = "past exams"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory name used under the platform config and data directories
pub const APP_DIR: &str = "recall";

/// Environment variable overriding the database location
pub const DATABASE_ENV: &str = "RECALL_DATABASE";

const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "questions.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file; defaults to the platform data directory
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Maximum questions presented in one review session
    pub session_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Source label used when an import does not name one
    pub default_source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub review: ReviewConfig,
    pub import: ImportConfig,
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load configuration.
    ///
    /// An explicitly given path must exist. A missing file at the default
    /// location just means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !required && !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Database location: `RECALL_DATABASE`, then the config file, then the
    /// platform data directory
    pub fn database_path(&self) -> Result<PathBuf> {
        let from_env = std::env::var_os(DATABASE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        self.resolve_database_path(from_env)
    }

    fn resolve_database_path(&self, from_env: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = from_env.or_else(|| self.storage.database_path.clone()) {
            return Ok(path);
        }

        dirs::data_local_dir()
            .map(|p| p.join(APP_DIR).join(DATABASE_FILE))
            .ok_or(ConfigError::DataDirNotFound)
    }
}
