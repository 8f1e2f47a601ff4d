use thiserror::Error;

use hearth_kv::KVError;

/// Users subsystem error type.
#[derive(Debug, Error)]
pub enum UsersError {
    /// Notification type outside the recognized set. Nothing was written.
    #[error("invalid notification type: {0}")]
    InvalidNotificationType(String),

    /// Several pending notifications shared one timestamp. All of them were
    /// already moved to the shown list when this is returned.
    #[error("multiple notifications at {0}")]
    UniqueKeyError(i64),

    /// The user has no password configured.
    #[error("no password configured")]
    CredentialUnavailable,

    /// The stored credential is in the legacy format and no legacy crypt
    /// primitive is available here.
    #[error("legacy password hash not supported on this platform")]
    LegacyHashUnsupported,

    #[error("invalid username: {0}")]
    InvalidUsername(String),

    #[error("storage: {0}")]
    Storage(#[from] KVError),
}
