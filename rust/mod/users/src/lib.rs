//! Users module: credentials and notification state kept in each user's record.
//!
//! # Pieces
//!
//! - **Credentials**: salted SHA-256 password hashes, legacy crypt(3) fallback
//! - **Inbox**: bounded FIFO of pending notifications plus the shown log
//! - **Global notifications**: one broadcast per severity, shown once per user
//!
//! # Usage
//!
//! ```ignore
//! use hearth_users::{UsersConfig, UsersService};
//!
//! let svc = UsersService::new(kv, UsersConfig::default());
//! let mut alice = svc.user("alice")?;
//! alice.notify("ViewObject", "client:C.1000", "Flow finished", "flows")?;
//! let shown = alice.show_notifications(true)?;
//!
//! let registry = svc.global_notifications();
//! for n in alice.pending_global_notifications(&registry)? {
//!     alice.mark_global_notification_as_shown(&n)?;
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod global;
pub mod inbox;
pub mod notification;
pub mod password;
pub mod service;
pub mod user;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::UsersConfig;
pub use error::UsersError;
pub use global::{
    GlobalNotification, GlobalNotificationSet, GlobalNotificationStorage, GlobalNotificationType,
};
pub use inbox::NotificationInbox;
pub use notification::{Notification, NotificationType};
pub use password::{constant_time_eq, CryptedPassword, LegacyCrypt, NoLegacyCrypt};
pub use service::UsersService;
pub use user::UserRecord;
