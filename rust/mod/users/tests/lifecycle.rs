use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use hearth_kv::{KVStore, RedbStore};
use hearth_users::{
    Clock, GlobalNotification, GlobalNotificationType, ManualClock, UsersConfig, UsersError,
    UsersService,
};

fn open(tmp: &TempDir, clock: Arc<ManualClock>, config: UsersConfig) -> UsersService {
    let kv: Arc<dyn KVStore> = Arc::new(RedbStore::open(&tmp.path().join("users.redb")).unwrap());
    UsersService::new(kv, config).with_clock(clock)
}

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap(),
    ))
}

#[test]
fn test_inbox_lifecycle_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let clock = clock();
    let config = UsersConfig {
        pending_capacity: 3,
        ..Default::default()
    };

    let mut stamps = Vec::new();
    {
        let svc = open(&tmp, clock.clone(), config.clone());
        let mut user = svc.user("alice").unwrap();
        for i in 0..5 {
            let n = user
                .notify("HostInformation", "client:C.1", &format!("host {i}"), "interrogate")
                .unwrap();
            stamps.push(n.timestamp);
            clock.advance(Duration::milliseconds(1));
        }
    }

    let svc = open(&tmp, clock.clone(), config);
    let mut user = svc.user("alice").unwrap();
    let pending: Vec<i64> = user
        .inbox()
        .unwrap()
        .pending()
        .iter()
        .map(|n| n.timestamp)
        .collect();
    assert_eq!(pending, stamps[2..].to_vec());

    user.delete_pending_notification(stamps[3]).unwrap();
    let first = user.show_notifications(true).unwrap();
    let messages: Vec<&str> = first.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(messages, vec!["host 2", "host 4", "host 3"]);

    let second = user.show_notifications(true).unwrap();
    assert_eq!(second, first);
    assert!(user.inbox().unwrap().pending().is_empty());
}

#[test]
fn test_password_end_to_end() {
    let tmp = TempDir::new().unwrap();
    let svc = open(&tmp, clock(), UsersConfig::default());

    let mut bob = svc.user("bob").unwrap();
    assert!(matches!(
        bob.check_password("x"),
        Err(UsersError::CredentialUnavailable)
    ));

    bob.set_password("tr0ub4dor").unwrap();
    assert!(bob.check_password("tr0ub4dor").unwrap());
    assert!(!bob.check_password("x").unwrap());
}

#[test]
fn test_global_notifications_across_users() {
    let tmp = TempDir::new().unwrap();
    let clock = clock();
    let svc = open(&tmp, clock.clone(), UsersConfig::default());

    let mut registry = svc.global_notifications();
    registry
        .add_notification(
            GlobalNotification::new(
                GlobalNotificationType::Warning,
                "upgrade tonight",
                clock.now(),
                Duration::days(1),
            )
            .with_link("https://status.example.com"),
        )
        .unwrap();
    registry
        .add_notification(svc.new_global_notification(GlobalNotificationType::Info, "welcome"))
        .unwrap();

    let mut alice = svc.user("alice").unwrap();
    let pending = alice.pending_global_notifications(&registry).unwrap();
    let types: Vec<_> = pending.iter().map(|n| n.notification_type).collect();
    assert_eq!(
        types,
        vec![GlobalNotificationType::Info, GlobalNotificationType::Warning]
    );
    for n in &pending {
        alice.mark_global_notification_as_shown(n).unwrap();
    }
    assert!(alice.pending_global_notifications(&registry).unwrap().is_empty());

    let carol = svc.user("carol").unwrap();
    assert_eq!(carol.pending_global_notifications(&registry).unwrap().len(), 2);

    // The warning window closes after a day; the info one lasts two weeks.
    clock.advance(Duration::days(1) + Duration::seconds(1));
    let left = carol.pending_global_notifications(&registry).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].message, "welcome");
}
