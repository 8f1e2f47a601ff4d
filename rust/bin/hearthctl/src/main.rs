//! `hearthctl`: administrative CLI for user credentials and notifications.
//!
//! Usage:
//!   hearthctl [--config hearth.toml] user set-password alice
//!   hearthctl global add --type warning --message "Upgrade tonight"
//!
//! Operates directly on the redb database named in the config file.

mod commands;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use hearth_kv::{KVStore, RedbStore};
use hearth_users::{GlobalNotificationType, UsersService};

use config::CtlConfig;

/// Hearth admin CLI.
#[derive(Parser, Debug)]
#[command(name = "hearthctl", about = "Hearth user state admin CLI")]
struct Cli {
    /// Path to config file.
    #[arg(long = "config", env = "HEARTH_CONFIG", default_value = "hearth.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Per-user credentials and inbox.
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Broadcast notifications shown once to every user.
    Global {
        #[command(subcommand)]
        action: GlobalAction,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum UserAction {
    /// Set a user's password.
    SetPassword {
        name: String,
        /// Password (prefer the interactive prompt).
        #[arg(long)]
        password: Option<String>,
    },
    /// Check a password against the stored credential.
    CheckPassword {
        name: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Queue a notification for a user.
    Notify {
        name: String,
        /// Notification type, e.g. ViewObject, HostInformation, GrantAccess.
        #[arg(long = "type")]
        message_type: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        message: String,
        #[arg(long, default_value = "hearthctl")]
        source: String,
    },
    /// Print pending + shown notifications and mark pending ones shown.
    Show {
        name: String,
        /// Don't mark pending notifications as shown.
        #[arg(long)]
        keep: bool,
    },
    /// Move the pending notification with this timestamp to shown.
    Ack { name: String, timestamp: i64 },
    /// Describe a user.
    Describe { name: String },
}

#[derive(Subcommand, Debug)]
enum GlobalAction {
    /// Add or replace the global notification of a severity.
    Add {
        #[arg(long = "type", value_enum)]
        severity: Severity,
        #[arg(long)]
        message: String,
        #[arg(long)]
        link: Option<String>,
        /// RFC 3339 start of the visibility window (default: now).
        #[arg(long)]
        show_from: Option<String>,
        /// Window length in seconds (default from config).
        #[arg(long)]
        duration_secs: Option<i64>,
    },
    /// List active global notifications.
    List,
    /// Print global notifications a user has not seen yet.
    Pending {
        name: String,
        /// Mark the printed notifications as shown.
        #[arg(long)]
        mark: bool,
    },
}

/// CLI mirror of `GlobalNotificationType`, keeping clap out of hearth-users.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Severity {
    Info,
    Warning,
    Error,
}

impl From<Severity> for GlobalNotificationType {
    fn from(s: Severity) -> Self {
        match s {
            Severity::Info => GlobalNotificationType::Info,
            Severity::Warning => GlobalNotificationType::Warning,
            Severity::Error => GlobalNotificationType::Error,
        }
    }
}

fn read_password(password: Option<String>) -> anyhow::Result<String> {
    match password {
        Some(p) => Ok(p),
        None => Ok(rpassword::prompt_password("Password: ")?),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        println!("hearthctl v{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = CtlConfig::load(&cli.config)?;
    let db_path = &config.storage.db_path;
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    info!("Opening {}", db_path.display());
    let kv: Arc<dyn KVStore> = Arc::new(
        RedbStore::open(db_path)
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );
    let svc = UsersService::new(kv, config.users);

    match cli.command {
        Commands::User { action } => match action {
            UserAction::SetPassword { name, password } => {
                let password = read_password(password)?;
                commands::user::set_password(&svc, &name, &password)?;
            }
            UserAction::CheckPassword { name, password } => {
                let password = read_password(password)?;
                commands::user::check_password(&svc, &name, &password)?;
            }
            UserAction::Notify {
                name,
                message_type,
                subject,
                message,
                source,
            } => {
                commands::user::notify(&svc, &name, &message_type, &subject, &message, &source)?;
            }
            UserAction::Show { name, keep } => {
                commands::user::show(&svc, &name, keep)?;
            }
            UserAction::Ack { name, timestamp } => {
                commands::user::ack(&svc, &name, timestamp)?;
            }
            UserAction::Describe { name } => {
                commands::user::describe(&svc, &name)?;
            }
        },

        Commands::Global { action } => match action {
            GlobalAction::Add {
                severity,
                message,
                link,
                show_from,
                duration_secs,
            } => {
                commands::global::add(
                    &svc,
                    severity.into(),
                    &message,
                    link.as_deref(),
                    show_from.as_deref(),
                    duration_secs,
                )?;
            }
            GlobalAction::List => {
                commands::global::list(&svc)?;
            }
            GlobalAction::Pending { name, mark } => {
                commands::global::pending(&svc, &name, mark)?;
            }
        },

        Commands::Version => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_add() {
        let cli = Cli::try_parse_from([
            "hearthctl",
            "global",
            "add",
            "--type",
            "warning",
            "--message",
            "upgrade",
            "--duration-secs",
            "60",
        ])
        .unwrap();
        match cli.command {
            Commands::Global {
                action:
                    GlobalAction::Add {
                        severity,
                        duration_secs,
                        ..
                    },
            } => {
                assert_eq!(GlobalNotificationType::from(severity), GlobalNotificationType::Warning);
                assert_eq!(duration_secs, Some(60));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
