use std::sync::Arc;

use hearth_kv::{KVStore, Record};

use crate::clock::{Clock, SystemClock};
use crate::config::UsersConfig;
use crate::error::UsersError;
use crate::global::{GlobalNotification, GlobalNotificationStorage, GlobalNotificationType};
use crate::password::{LegacyCrypt, NoLegacyCrypt};
use crate::user::UserRecord;

/// Internal accounts that can never be opened as regular users.
pub const SYSTEM_USERS: [&str; 7] = [
    "System",
    "Worker",
    "Cron",
    "FrontEnd",
    "Console",
    "StatsStore",
    "EndToEndTest",
];

/// Entry point to user state. Holds the store handle, configuration and the
/// clock and legacy-crypt capabilities shared by every record it opens.
pub struct UsersService {
    pub(crate) kv: Arc<dyn KVStore>,
    pub(crate) config: UsersConfig,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) legacy: Arc<dyn LegacyCrypt>,
}

impl UsersService {
    pub fn new(kv: Arc<dyn KVStore>, config: UsersConfig) -> Self {
        Self {
            kv,
            config,
            clock: Arc::new(SystemClock),
            legacy: Arc::new(NoLegacyCrypt),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_legacy_crypt(mut self, legacy: Arc<dyn LegacyCrypt>) -> Self {
        self.legacy = legacy;
        self
    }

    /// Non-empty, free of the record key separator, and not a system account
    /// (compared case-insensitively).
    pub fn is_valid_username(username: &str) -> bool {
        !username.is_empty()
            && !username.contains(':')
            && !SYSTEM_USERS
                .iter()
                .any(|system| system.eq_ignore_ascii_case(username))
    }

    /// Open the record of `username`. Records exist implicitly; opening one
    /// writes nothing.
    pub fn user(&self, username: &str) -> Result<UserRecord<'_>, UsersError> {
        if !Self::is_valid_username(username) {
            return Err(UsersError::InvalidUsername(username.to_string()));
        }
        let record = Record::open(self.kv.clone(), format!("user:{username}"));
        Ok(UserRecord::new(self, username.to_string(), record))
    }

    /// Open the global notification registry.
    pub fn global_notifications(&self) -> GlobalNotificationStorage {
        GlobalNotificationStorage::open(self.kv.clone(), self.config.registry_urn.clone())
    }

    /// A global notification visible from now for the configured default
    /// duration.
    pub fn new_global_notification(
        &self,
        notification_type: GlobalNotificationType,
        message: impl Into<String>,
    ) -> GlobalNotification {
        GlobalNotification::new(
            notification_type,
            message,
            self.clock.now(),
            self.config.global_notification_duration(),
        )
    }
}
