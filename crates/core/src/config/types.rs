use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::assets::AssetConfig;
use crate::controller::ControllerConfig;
use crate::remote::ServiceConfig;

/// Root configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub limits: ControllerConfig,
    #[serde(default)]
    pub assets: AssetConfig,
}

/// Liked-set storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Key the liked set is stored under.
    #[serde(default = "default_liked_key")]
    pub liked_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            liked_key: default_liked_key(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("gamefinder.db")
}

fn default_liked_key() -> String {
    "likedGames".to_string()
}
