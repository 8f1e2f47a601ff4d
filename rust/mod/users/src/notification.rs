use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UsersError;

/// Kinds of per-user notification the UI knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationType {
    Discovery,
    ViewObject,
    HostInformation,
    FlowStatus,
    GrantAccess,
    ArchiveGenerationFinished,
    Error,
}

impl NotificationType {
    pub const ALL: [NotificationType; 7] = [
        NotificationType::Discovery,
        NotificationType::ViewObject,
        NotificationType::HostInformation,
        NotificationType::FlowStatus,
        NotificationType::GrantAccess,
        NotificationType::ArchiveGenerationFinished,
        NotificationType::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Discovery => "Discovery",
            NotificationType::ViewObject => "ViewObject",
            NotificationType::HostInformation => "HostInformation",
            NotificationType::FlowStatus => "FlowStatus",
            NotificationType::GrantAccess => "GrantAccess",
            NotificationType::ArchiveGenerationFinished => "ArchiveGenerationFinished",
            NotificationType::Error => "Error",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = UsersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UsersError::InvalidNotificationType(s.to_string()))
    }
}

/// A single notification in a user's inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    /// What the notification is about, normally a URN.
    pub subject: String,
    pub message: String,
    /// Component that raised the notification.
    pub source: String,
    /// Microseconds since the Unix epoch. Treated as the notification's key.
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_types() {
        for t in NotificationType::ALL {
            assert_eq!(t.as_str().parse::<NotificationType>().unwrap(), t);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let err = "viewobject".parse::<NotificationType>().unwrap_err();
        assert!(matches!(err, UsersError::InvalidNotificationType(t) if t == "viewobject"));
    }

    #[test]
    fn test_wire_names_match_display() {
        let n = Notification {
            notification_type: NotificationType::GrantAccess,
            subject: "client:C.1000".into(),
            message: "approved".into(),
            source: "approvals".into(),
            timestamp: 42,
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "GrantAccess");
        assert_eq!(json["timestamp"], 42);
    }
}
