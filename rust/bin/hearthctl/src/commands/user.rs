//! Per-user commands.

use anyhow::{Result, bail};

use hearth_users::{UsersError, UsersService};

pub fn set_password(svc: &UsersService, name: &str, password: &str) -> Result<()> {
    if password.is_empty() {
        bail!("Password cannot be empty.");
    }
    svc.user(name)?.set_password(password)?;
    println!("Password set for {}.", name);
    Ok(())
}

pub fn check_password(svc: &UsersService, name: &str, password: &str) -> Result<()> {
    match svc.user(name)?.check_password(password) {
        Ok(true) => {
            println!("match");
            Ok(())
        }
        Ok(false) => bail!("password does not match"),
        Err(UsersError::CredentialUnavailable) => bail!("no password set for {}", name),
        Err(e) => Err(e.into()),
    }
}

pub fn notify(
    svc: &UsersService,
    name: &str,
    message_type: &str,
    subject: &str,
    message: &str,
    source: &str,
) -> Result<()> {
    let notification = svc.user(name)?.notify(message_type, subject, message, source)?;
    println!("{}", notification.timestamp);
    Ok(())
}

pub fn show(svc: &UsersService, name: &str, keep: bool) -> Result<()> {
    let notifications = svc.user(name)?.show_notifications(!keep)?;
    println!("{}", serde_json::to_string_pretty(&notifications)?);
    Ok(())
}

pub fn ack(svc: &UsersService, name: &str, timestamp: i64) -> Result<()> {
    svc.user(name)?.delete_pending_notification(timestamp)?;
    Ok(())
}

pub fn describe(svc: &UsersService, name: &str) -> Result<()> {
    println!("{}", svc.user(name)?.describe()?);
    Ok(())
}
