#![cfg(feature = "local-fs")]

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use keepsake::node::{snapshot_of, state_from_snapshot};
use keepsake::prelude::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct CounterState {
    count: i32,
}

// Minimal host node; it never notifies, so storage tests drive save/load
// manually.
#[derive(Default)]
struct CounterModel {
    state: Mutex<CounterState>,
}

impl CounterModel {
    fn create_with(count: i32) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(CounterState { count }),
        })
    }

    fn count(&self) -> i32 {
        self.state.lock().unwrap().count
    }
}

impl ObservableNode for CounterModel {
    fn current_snapshot(&self) -> Snapshot {
        snapshot_of(&*self.state.lock().unwrap()).expect("state serializes to a mapping")
    }

    fn apply_snapshot(&self, snapshot: Snapshot) -> anyhow::Result<()> {
        *self.state.lock().unwrap() = state_from_snapshot(snapshot)?;
        Ok(())
    }

    fn on_snapshot(&self, _listener: SnapshotListener) -> SubscriptionHandle {
        SubscriptionHandle::new(|| {})
    }
}

#[tokio::test]
async fn test_local_fs_set_then_get() {
    let dir = TempDir::new().unwrap();
    let store = LocalFsStore::new(dir.path());

    store.set("Counter", r#"{"count":7}"#).await.unwrap();

    let payload = store.get("Counter").await.unwrap();
    assert_eq!(payload.as_deref(), Some(r#"{"count":7}"#));

    assert!(dir.path().join("Counter").exists());
}

#[tokio::test]
async fn test_local_fs_missing_key() {
    let dir = TempDir::new().unwrap();
    let store = LocalFsStore::new(dir.path());

    assert!(store.get("Counter").await.unwrap().is_none());
}

#[tokio::test]
async fn test_local_fs_creates_root_on_first_write() {
    let dir = TempDir::new().unwrap();
    let store = LocalFsStore::new(dir.path().join("nested").join("data"));

    store.set("Counter", "{}").await.unwrap();

    assert!(dir.path().join("nested").join("data").join("Counter").exists());
}

#[tokio::test]
async fn test_local_fs_overwrites_previous_payload() {
    let dir = TempDir::new().unwrap();
    let store = LocalFsStore::new(dir.path());

    store.set("Counter", r#"{"count":1}"#).await.unwrap();
    store.set("Counter", r#"{"count":2}"#).await.unwrap();

    let payload = store.get("Counter").await.unwrap();
    assert_eq!(payload.as_deref(), Some(r#"{"count":2}"#));
}

#[tokio::test]
async fn test_persistence_over_local_fs() {
    let dir = TempDir::new().unwrap();

    let model = CounterModel::create_with(41);
    let persistence = model.persisted(
        LocalFsStore::new(dir.path()),
        PersistOptions::new().auto_save(false),
    );
    persistence.save().await.unwrap();

    let restored = CounterModel::create_with(0);
    let restored_persistence = restored.persisted(
        LocalFsStore::new(dir.path()),
        PersistOptions::new().auto_save(false),
    );
    let data = restored_persistence.load().await.unwrap();

    assert!(data.is_some());
    assert_eq!(restored.count(), 41);
}

#[tokio::test]
async fn test_memory_store_records_access() {
    let store = MemoryStore::new();
    store.seed("Counter", r#"{"count":1}"#);

    assert_eq!(store.write_count(), 0);
    assert_eq!(store.payload("Counter").as_deref(), Some(r#"{"count":1}"#));

    store.set("Counter", r#"{"count":2}"#).await.unwrap();
    let read = store.get("Counter").await.unwrap();

    assert_eq!(read.as_deref(), Some(r#"{"count":2}"#));
    assert_eq!(store.reads(), vec!["Counter".to_string()]);
    assert_eq!(
        store.writes(),
        vec![("Counter".to_string(), r#"{"count":2}"#.to_string())]
    );
}
