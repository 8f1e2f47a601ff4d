//! Broadcast notifications shown once to every user.
//!
//! The registry keeps at most one active notification per severity type in a
//! singleton record. Users track what they have already seen in their own
//! record (see [`crate::user::UserRecord::pending_global_notifications`]).

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use hearth_kv::{KVStore, Record};

use crate::error::UsersError;

const NOTIFICATIONS: &str = "notifications";

/// Severity of a global notification, in ascending priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GlobalNotificationType {
    Info,
    Warning,
    Error,
}

/// A notification broadcast to all users during `[show_from, show_from + duration]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalNotification {
    #[serde(rename = "type")]
    pub notification_type: GlobalNotificationType,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub show_from: DateTime<Utc>,
    /// Stored with whole-second precision.
    #[serde(with = "duration_secs")]
    pub duration: Duration,
}

impl GlobalNotification {
    pub fn new(
        notification_type: GlobalNotificationType,
        message: impl Into<String>,
        show_from: DateTime<Utc>,
        duration: Duration,
    ) -> Self {
        Self {
            notification_type,
            message: message.into(),
            link: None,
            show_from,
            duration,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Whether `now` falls inside the visibility window, both ends included.
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        if now < self.show_from {
            return false;
        }
        match self.show_from.checked_add_signed(self.duration) {
            Some(end) => now <= end,
            None => true,
        }
    }
}

mod duration_secs {
    use chrono::Duration;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(d)?;
        Duration::try_seconds(secs).ok_or_else(|| D::Error::custom("duration out of range"))
    }
}

/// At most one notification per type, iterated in ascending type priority.
///
/// Serialized as a plain list; a list holding the same type twice keeps the
/// later entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "Vec<GlobalNotification>",
    into = "Vec<GlobalNotification>"
)]
pub struct GlobalNotificationSet {
    notifications: Vec<GlobalNotification>,
}

impl GlobalNotificationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `notification`, replacing any existing one of the same type.
    pub fn add_notification(&mut self, notification: GlobalNotification) {
        self.notifications
            .retain(|n| n.notification_type != notification.notification_type);
        self.notifications.push(notification);
        self.notifications.sort_by_key(|n| n.notification_type);
    }

    /// Structural membership: an edited notification is not "contained" even
    /// if one of its type is.
    pub fn contains(&self, notification: &GlobalNotification) -> bool {
        self.notifications.contains(notification)
    }

    pub fn get(&self, notification_type: GlobalNotificationType) -> Option<&GlobalNotification> {
        self.notifications
            .iter()
            .find(|n| n.notification_type == notification_type)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GlobalNotification> {
        self.notifications.iter()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

impl From<Vec<GlobalNotification>> for GlobalNotificationSet {
    fn from(list: Vec<GlobalNotification>) -> Self {
        let mut set = GlobalNotificationSet::new();
        for notification in list {
            set.add_notification(notification);
        }
        set
    }
}

impl From<GlobalNotificationSet> for Vec<GlobalNotification> {
    fn from(set: GlobalNotificationSet) -> Self {
        set.notifications
    }
}

impl<'a> IntoIterator for &'a GlobalNotificationSet {
    type Item = &'a GlobalNotification;
    type IntoIter = std::slice::Iter<'a, GlobalNotification>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Handle on the singleton record holding the active global notifications.
///
/// Written by administrators, read on behalf of every user. Concurrent
/// `add_notification` calls race; the later flush wins.
pub struct GlobalNotificationStorage {
    record: Record,
}

impl GlobalNotificationStorage {
    pub fn open(kv: Arc<dyn KVStore>, urn: impl Into<String>) -> Self {
        Self {
            record: Record::open(kv, urn),
        }
    }

    /// The current set, empty if nothing was ever added.
    pub fn notifications(&self) -> Result<GlobalNotificationSet, UsersError> {
        Ok(self.record.get_or_default(NOTIFICATIONS)?)
    }

    /// Add or replace the notification of `notification`'s type and persist.
    pub fn add_notification(&mut self, notification: GlobalNotification) -> Result<(), UsersError> {
        let mut current = self.notifications()?;
        info!(
            "global notification {:?} set in {}",
            notification.notification_type,
            self.record.urn()
        );
        current.add_notification(notification);

        self.record.set(NOTIFICATIONS, &current)?;
        self.record.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use hearth_kv::MemoryKV;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    fn notification(t: GlobalNotificationType, message: &str) -> GlobalNotification {
        GlobalNotification::new(t, message, at(0), Duration::hours(2))
    }

    #[test]
    fn test_add_replaces_same_type() {
        let mut set = GlobalNotificationSet::new();
        set.add_notification(notification(GlobalNotificationType::Warning, "first"));
        set.add_notification(notification(GlobalNotificationType::Warning, "second"));

        assert_eq!(set.len(), 1);
        assert_eq!(
            set.get(GlobalNotificationType::Warning).unwrap().message,
            "second"
        );
    }

    #[test]
    fn test_iterates_in_priority_order() {
        let mut set = GlobalNotificationSet::new();
        set.add_notification(notification(GlobalNotificationType::Error, "e"));
        set.add_notification(notification(GlobalNotificationType::Info, "i"));
        set.add_notification(notification(GlobalNotificationType::Warning, "w"));

        let order: Vec<_> = set.iter().map(|n| n.notification_type).collect();
        assert_eq!(
            order,
            vec![
                GlobalNotificationType::Info,
                GlobalNotificationType::Warning,
                GlobalNotificationType::Error,
            ]
        );
    }

    #[test]
    fn test_contains_is_structural() {
        let mut set = GlobalNotificationSet::new();
        let original = notification(GlobalNotificationType::Info, "maintenance at 10");
        set.add_notification(original.clone());

        assert!(set.contains(&original));
        let edited = notification(GlobalNotificationType::Info, "maintenance at 11");
        assert!(!set.contains(&edited));
        assert!(!set.contains(&original.clone().with_link("https://status")));
    }

    #[test]
    fn test_visibility_window_is_inclusive() {
        let n = notification(GlobalNotificationType::Info, "x");
        assert!(!n.is_visible_at(at(0) - Duration::seconds(1)));
        assert!(n.is_visible_at(at(0)));
        assert!(n.is_visible_at(at(1)));
        assert!(n.is_visible_at(at(2)));
        assert!(!n.is_visible_at(at(2) + Duration::seconds(1)));
    }

    #[test]
    fn test_deserialize_collapses_duplicate_types() {
        let list = vec![
            notification(GlobalNotificationType::Error, "old"),
            notification(GlobalNotificationType::Info, "i"),
            notification(GlobalNotificationType::Error, "new"),
        ];
        let json = serde_json::to_string(&list).unwrap();
        let set: GlobalNotificationSet = serde_json::from_str(&json).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get(GlobalNotificationType::Error).unwrap().message, "new");
    }

    #[test]
    fn test_serialized_form() {
        let n = notification(GlobalNotificationType::Warning, "w").with_link("https://x");
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "WARNING");
        assert_eq!(json["duration"], 7200);
        assert_eq!(json["link"], "https://x");

        let back: GlobalNotification = serde_json::from_value(json).unwrap();
        assert_eq!(back, n);
    }

    #[test]
    fn test_storage_starts_empty_and_persists() {
        let kv: Arc<dyn KVStore> = Arc::new(MemoryKV::new());
        let mut storage = GlobalNotificationStorage::open(kv.clone(), "config:global_notifications");
        assert!(storage.notifications().unwrap().is_empty());

        storage
            .add_notification(notification(GlobalNotificationType::Info, "one"))
            .unwrap();
        storage
            .add_notification(notification(GlobalNotificationType::Info, "two"))
            .unwrap();

        let reopened = GlobalNotificationStorage::open(kv, "config:global_notifications");
        let set = reopened.notifications().unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(GlobalNotificationType::Info).unwrap().message, "two");
    }
}
