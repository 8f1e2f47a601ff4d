//! Global notification commands.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};

use hearth_users::{GlobalNotificationType, UsersService};

pub fn add(
    svc: &UsersService,
    notification_type: GlobalNotificationType,
    message: &str,
    link: Option<&str>,
    show_from: Option<&str>,
    duration_secs: Option<i64>,
) -> Result<()> {
    let mut notification = svc.new_global_notification(notification_type, message);
    if let Some(link) = link {
        notification = notification.with_link(link);
    }
    if let Some(from) = show_from {
        notification.show_from = DateTime::parse_from_rfc3339(from)
            .with_context(|| format!("invalid --show-from {:?}", from))?
            .with_timezone(&Utc);
    }
    if let Some(secs) = duration_secs {
        notification.duration =
            Duration::try_seconds(secs).context("--duration-secs out of range")?;
    }

    svc.global_notifications().add_notification(notification)?;
    Ok(())
}

pub fn list(svc: &UsersService) -> Result<()> {
    let set = svc.global_notifications().notifications()?;
    println!("{}", serde_json::to_string_pretty(&set)?);
    Ok(())
}

pub fn pending(svc: &UsersService, name: &str, mark: bool) -> Result<()> {
    let registry = svc.global_notifications();
    let mut user = svc.user(name)?;
    let pending = user.pending_global_notifications(&registry)?;
    println!("{}", serde_json::to_string_pretty(&pending)?);

    if mark {
        for notification in &pending {
            user.mark_global_notification_as_shown(notification)?;
        }
    }
    Ok(())
}
