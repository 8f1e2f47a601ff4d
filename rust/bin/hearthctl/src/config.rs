//! `hearthctl` configuration file.
//!
//! ```toml
//! [storage]
//! db_path = "/var/lib/hearth/users.redb"
//!
//! [users]
//! pending_capacity = 50
//! global_notification_duration_secs = 1209600
//! registry_urn = "config:global_notifications"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use hearth_users::UsersConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the redb database file.
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("hearth.redb"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CtlConfig {
    pub storage: StorageConfig,
    pub users: UsersConfig,
}

impl CtlConfig {
    /// Load config from disk, or return defaults if the file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: CtlConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
