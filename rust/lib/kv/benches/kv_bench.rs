use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use tempfile::TempDir;

use hearth_kv::{KVStore, MemoryKV, Record, RedbStore};

/// A full pending inbox: 50 notification objects as the users module
/// serializes them.
fn pending_inbox(user: u64) -> Vec<Value> {
    (0..50)
        .map(|i| {
            json!({
                "type": "HostInformation",
                "subject": format!("client:C.{user:04}"),
                "message": format!("Interrogation {i} finished"),
                "source": "interrogate",
                "timestamp": 1_717_243_200_000_000i64 + i,
            })
        })
        .collect()
}

/// Committing a user's pending and shown lists together, the write done by
/// deleting a pending notification.
fn bench_redb_inbox_commit(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();
    let pending = serde_json::to_vec(&pending_inbox(0)).unwrap();
    let shown = serde_json::to_vec(&pending_inbox(1)).unwrap();

    c.bench_function("redb_inbox_commit", |b| {
        let mut user = 0u64;
        b.iter(|| {
            let pending_key = format!("user:u{user}:pending_notifications");
            let shown_key = format!("user:u{user}:shown_notifications");
            store
                .batch_set(black_box(&[
                    (pending_key.as_str(), pending.as_slice()),
                    (shown_key.as_str(), shown.as_slice()),
                ]))
                .unwrap();
            user += 1;
        });
    });
}

/// Listing every attribute of one user among a thousand populated ones.
fn bench_redb_user_scan(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let store = RedbStore::open(&tmp.path().join("bench.redb")).unwrap();
    let pending = serde_json::to_vec(&pending_inbox(0)).unwrap();

    for user in 0..1000 {
        store
            .batch_set(&[
                (format!("user:u{user:04}:password").as_str(), b"\"sha256$00$ff\"".as_slice()),
                (format!("user:u{user:04}:pending_notifications").as_str(), pending.as_slice()),
            ])
            .unwrap();
    }

    c.bench_function("redb_user_scan", |b| {
        let mut user = 0u64;
        b.iter(|| {
            let prefix = format!("user:u{:04}:", user % 1000);
            let attributes = store.scan(black_box(&prefix)).unwrap();
            assert_eq!(attributes.len(), 2);
            user += 1;
        });
    });
}

/// Read-modify-write of a full pending inbox, the shape of `notify` once the
/// capacity has been reached.
fn bench_record_flush(c: &mut Criterion) {
    let tmp = TempDir::new().unwrap();
    let redb: Arc<dyn KVStore> = Arc::new(RedbStore::open(&tmp.path().join("bench.redb")).unwrap());
    let memory: Arc<dyn KVStore> = Arc::new(MemoryKV::new());

    for (name, kv) in [("record_flush_redb", redb), ("record_flush_memory", memory)] {
        let mut record = Record::open(kv, "user:bench");
        record.set("pending_notifications", &pending_inbox(0)).unwrap();
        record.flush().unwrap();
        let incoming = pending_inbox(1).remove(0);

        c.bench_function(name, |b| {
            b.iter(|| {
                let mut pending: Vec<Value> =
                    record.get_or_default("pending_notifications").unwrap();
                pending.remove(0);
                pending.push(black_box(incoming.clone()));
                record.set("pending_notifications", &pending).unwrap();
                record.flush().unwrap();
            });
        });
    }
}

criterion_group!(
    benches,
    bench_redb_inbox_commit,
    bench_redb_user_scan,
    bench_record_flush
);
criterion_main!(benches);
