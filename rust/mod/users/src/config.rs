use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Configuration for the users subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsersConfig {
    /// Maximum pending notifications kept per user; older ones are evicted.
    pub pending_capacity: usize,
    /// Visibility window given to a global notification created without one
    /// (seconds, default: 2 weeks).
    pub global_notification_duration_secs: i64,
    /// Record holding the process-wide global notification set.
    pub registry_urn: String,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            pending_capacity: 50,
            global_notification_duration_secs: 14 * 24 * 3600,
            registry_urn: "config:global_notifications".to_string(),
        }
    }
}

impl UsersConfig {
    pub fn global_notification_duration(&self) -> Duration {
        Duration::seconds(self.global_notification_duration_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: UsersConfig = serde_json::from_str(r#"{"pending_capacity": 10}"#).unwrap();
        assert_eq!(config.pending_capacity, 10);
        assert_eq!(config.registry_urn, "config:global_notifications");
        assert_eq!(config.global_notification_duration(), Duration::weeks(2));
    }
}
