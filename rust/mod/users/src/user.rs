use std::collections::VecDeque;

use tracing::{debug, info, warn};

use hearth_kv::Record;

use crate::error::UsersError;
use crate::global::{GlobalNotification, GlobalNotificationSet, GlobalNotificationStorage};
use crate::inbox::NotificationInbox;
use crate::notification::{Notification, NotificationType};
use crate::password::CryptedPassword;
use crate::service::UsersService;

const PASSWORD: &str = "password";
const PENDING_NOTIFICATIONS: &str = "pending_notifications";
const SHOWN_NOTIFICATIONS: &str = "shown_notifications";
const SHOWN_GLOBAL_NOTIFICATIONS: &str = "shown_global_notifications";

/// One user's record: credential, notification inbox and the set of global
/// notifications already shown to them.
///
/// Every mutating call is a read-modify-write of the record's attributes
/// followed by a flush. There is no locking; callers that need concurrent
/// writers on one user serialize them themselves.
pub struct UserRecord<'a> {
    service: &'a UsersService,
    username: String,
    record: Record,
}

impl<'a> UserRecord<'a> {
    pub(crate) fn new(service: &'a UsersService, username: String, record: Record) -> Self {
        Self {
            service,
            username,
            record,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    // ── Credentials ──

    /// Store a freshly salted credential for `password`.
    pub fn set_password(&mut self, password: &str) -> Result<(), UsersError> {
        let credential = CryptedPassword::new(password, None);
        self.record.set(PASSWORD, &credential)?;
        self.record.flush()?;
        info!("password set for user {}", self.username);
        Ok(())
    }

    pub fn has_password(&self) -> Result<bool, UsersError> {
        Ok(self.record.get::<CryptedPassword>(PASSWORD)?.is_some())
    }

    /// Check `candidate` against the stored credential.
    ///
    /// Returns `CredentialUnavailable` rather than `Ok(false)` when no
    /// password was ever set.
    pub fn check_password(&self, candidate: &str) -> Result<bool, UsersError> {
        let credential: CryptedPassword = self
            .record
            .get(PASSWORD)?
            .ok_or(UsersError::CredentialUnavailable)?;
        credential.check(candidate, self.service.legacy.as_ref())
    }

    // ── Notification inbox ──

    /// Current inbox contents as stored.
    pub fn inbox(&self) -> Result<NotificationInbox, UsersError> {
        let pending: VecDeque<Notification> = self.record.get_or_default(PENDING_NOTIFICATIONS)?;
        let shown: Vec<Notification> = self.record.get_or_default(SHOWN_NOTIFICATIONS)?;
        Ok(NotificationInbox::from_parts(
            pending,
            shown,
            self.service.config.pending_capacity,
        ))
    }

    fn store_inbox(&mut self, inbox: NotificationInbox) -> Result<(), UsersError> {
        let (pending, shown) = inbox.into_parts();
        self.record.set(PENDING_NOTIFICATIONS, &pending)?;
        self.record.set(SHOWN_NOTIFICATIONS, &shown)?;
        self.record.flush()?;
        Ok(())
    }

    /// Queue a notification for the UI.
    ///
    /// `message_type` must name a [`NotificationType`]; anything else fails
    /// before the record is touched. The oldest pending notifications are
    /// evicted once the configured capacity is exceeded.
    pub fn notify(
        &mut self,
        message_type: &str,
        subject: &str,
        message: &str,
        source: &str,
    ) -> Result<Notification, UsersError> {
        let notification_type: NotificationType = message_type.parse()?;

        let notification = Notification {
            notification_type,
            subject: subject.to_string(),
            message: message.to_string(),
            source: source.to_string(),
            timestamp: self.service.clock.now_micros(),
        };

        let mut inbox = self.inbox()?;
        let evicted = inbox.push(notification.clone());
        if evicted > 0 {
            debug!(
                "user {}: evicted {} oldest pending notifications",
                self.username, evicted
            );
        }

        let (pending, _) = inbox.into_parts();
        self.record.set(PENDING_NOTIFICATIONS, &pending)?;
        self.record.flush()?;
        Ok(notification)
    }

    /// Move the pending notification with `timestamp` to the shown list.
    ///
    /// No match is a no-op. If several pending notifications share the
    /// timestamp, all of them are moved and persisted first and
    /// `UniqueKeyError` is returned afterwards.
    pub fn delete_pending_notification(&mut self, timestamp: i64) -> Result<(), UsersError> {
        let mut inbox = self.inbox()?;
        let moved = inbox.take_pending(timestamp);
        if moved == 0 {
            return Ok(());
        }

        self.store_inbox(inbox)?;

        if moved > 1 {
            warn!(
                "user {}: {} pending notifications shared timestamp {}",
                self.username, moved, timestamp
            );
            return Err(UsersError::UniqueKeyError(timestamp));
        }
        Ok(())
    }

    /// Pending notifications followed by shown ones.
    ///
    /// With `reset`, the returned list becomes the shown list, pending is
    /// cleared and both are persisted before returning. Without it nothing is
    /// written.
    pub fn show_notifications(&mut self, reset: bool) -> Result<Vec<Notification>, UsersError> {
        let mut inbox = self.inbox()?;
        if !reset {
            return Ok(inbox.merged());
        }

        let merged = inbox.reset();
        self.store_inbox(inbox)?;
        Ok(merged)
    }

    // ── Global notifications ──

    /// Global notifications this user has not seen yet and that are visible
    /// now, in the registry's type order.
    ///
    /// "Seen" is structural equality with an entry of the user's shown set,
    /// so a notification edited after being shown counts as new.
    pub fn pending_global_notifications(
        &self,
        registry: &GlobalNotificationStorage,
    ) -> Result<Vec<GlobalNotification>, UsersError> {
        let current = registry.notifications()?;
        let shown = self.shown_global_notifications()?;
        let now = self.service.clock.now();

        Ok(current
            .iter()
            .filter(|n| !shown.contains(n))
            .filter(|n| n.is_visible_at(now))
            .cloned()
            .collect())
    }

    pub fn shown_global_notifications(&self) -> Result<GlobalNotificationSet, UsersError> {
        Ok(self.record.get_or_default(SHOWN_GLOBAL_NOTIFICATIONS)?)
    }

    /// Remember `notification` as shown, replacing whatever was recorded for
    /// its type.
    pub fn mark_global_notification_as_shown(
        &mut self,
        notification: &GlobalNotification,
    ) -> Result<(), UsersError> {
        let mut shown = self.shown_global_notifications()?;
        shown.add_notification(notification.clone());
        self.record.set(SHOWN_GLOBAL_NOTIFICATIONS, &shown)?;
        self.record.flush()?;
        Ok(())
    }

    /// Human-readable summary of the user.
    pub fn describe(&self) -> Result<String, UsersError> {
        let password = if self.has_password()? { "set" } else { "not set" };
        Ok(format!("Username: {}\nPassword: {}", self.username, password))
    }
}
