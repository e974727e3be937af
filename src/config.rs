use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

// =============================================================================
// Catalog constants
// =============================================================================

/// Catalog refresh interval in milliseconds (24 hours)
pub const DEFAULT_REFRESH_INTERVAL_MS: i64 = 24 * 60 * 60 * 1000;

/// Only CPython 3.x is managed
pub const PYTHON_MAJOR: u32 = 3;

/// Oldest release line the catalog tracks
pub const SUPPORTED_MINIMUM_MINOR: u32 = 9;

/// Tags not starting with this prefix are not release tags
pub const RELEASE_TAG_PREFIX: &str = "v3";

/// Number of tags requested per feed page
pub const FEED_PAGE_SIZE: u32 = 100;

/// Default base URL for the GitHub API
pub const DEFAULT_FEED_BASE_URL: &str = "https://api.github.com";

/// Default base URL for python.org installer downloads
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = "https://www.python.org";

const APP_NAME: &str = "pim";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// User configuration
///
/// Only `allow_pre_release` affects version resolution; the remaining fields
/// are handed to the platform installer untouched.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct Config {
    pub allow_pre_release: bool,
    pub for_all_user: bool,
    pub target_directory: Option<PathBuf>,
    pub additional_installer_options: IndexMap<String, String>,
}

impl Config {
    /// Loads the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config file at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Returns the cache directory for pim.
/// Uses $XDG_CACHE_HOME/pim if XDG_CACHE_HOME is set,
/// otherwise falls back to ~/.cache/pim,
/// or ./pim if neither is available.
pub fn cache_dir() -> PathBuf {
    dir_with_env(
        std::env::var("XDG_CACHE_HOME").ok(),
        dirs::home_dir(),
        ".cache",
    )
}

/// Returns the config directory for pim ($XDG_CONFIG_HOME/pim or ~/.config/pim).
pub fn config_dir() -> PathBuf {
    dir_with_env(
        std::env::var("XDG_CONFIG_HOME").ok(),
        dirs::home_dir(),
        ".config",
    )
}

/// Returns the path to the default config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns the path to the catalog database.
pub fn catalog_db_path() -> PathBuf {
    cache_dir().join("catalog.db")
}

/// Returns the directory downloaded installers are kept in.
pub fn installer_dir() -> PathBuf {
    cache_dir().join("installer")
}

fn dir_with_env(xdg_home: Option<String>, home_dir: Option<PathBuf>, fallback: &str) -> PathBuf {
    let base = xdg_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(fallback)))
        .unwrap_or_else(|| PathBuf::from("."));

    base.join(APP_NAME)
}
