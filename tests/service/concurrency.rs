use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use user_records::{InMemoryStore, JsonFileStore, UserService};

use crate::support::{clock, new_user};

#[test]
fn concurrent_creates_get_unique_ids() {
    let service = Arc::new(UserService::new(InMemoryStore::new(), clock()));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                (0..10)
                    .map(|i| service.create(new_user(&format!("u{t}_{i}"))).unwrap().id)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let ids: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    let unique: HashSet<u64> = ids.iter().copied().collect();

    assert_eq!(ids.len(), 80);
    assert_eq!(unique.len(), 80);
    assert_eq!(unique, (1..=80).collect::<HashSet<u64>>());
    assert_eq!(service.list(&[]).unwrap().len(), 80);
}

#[test]
fn file_readers_never_see_a_partial_collection() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("users-db.json"));
    let service = Arc::new(UserService::new(store, clock()));
    let writing = Arc::new(AtomicBool::new(true));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            let writing = Arc::clone(&writing);
            thread::spawn(move || {
                let mut seen = 0;
                while writing.load(Ordering::SeqCst) {
                    let users = service
                        .list(&[])
                        .unwrap_or_else(|e| panic!("read failed mid-write: {e}"));
                    assert!(users.len() >= seen, "collection shrank");
                    seen = users.len();
                }
            })
        })
        .collect();

    for i in 0..50 {
        service.create(new_user(&format!("w{i}"))).unwrap();
    }
    writing.store(false, Ordering::SeqCst);

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(service.list(&[]).unwrap().len(), 50);
}
