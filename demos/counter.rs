//! Persistent counter. Run it a few times:
//!
//! ```sh
//! cargo run --example counter
//! ```
//!
//! Each run restores the count from the platform data directory,
//! increments it, and auto-save writes it back.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use keepsake::node::{snapshot_of, state_from_snapshot};
use keepsake::prelude::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct CounterState {
    count: u64,
}

#[derive(Default)]
struct Counter {
    state: Mutex<CounterState>,
    listeners: Arc<Mutex<Vec<(u64, SnapshotListener)>>>,
    next_listener_id: AtomicU64,
}

impl Counter {
    fn increment(&self) -> u64 {
        let count = {
            let mut state = self.state.lock().unwrap();
            state.count += 1;
            state.count
        };
        self.notify();
        count
    }

    fn notify(&self) {
        let snapshot = self.current_snapshot();
        for (_, listener) in self.listeners.lock().unwrap().iter() {
            listener(snapshot.clone());
        }
    }
}

impl ObservableNode for Counter {
    fn current_snapshot(&self) -> Snapshot {
        snapshot_of(&*self.state.lock().unwrap()).expect("state serializes to a mapping")
    }

    fn apply_snapshot(&self, snapshot: Snapshot) -> anyhow::Result<()> {
        *self.state.lock().unwrap() = state_from_snapshot(snapshot)?;
        Ok(())
    }

    fn on_snapshot(&self, listener: SnapshotListener) -> SubscriptionHandle {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().unwrap().push((id, listener));

        let listeners = self.listeners.clone();
        SubscriptionHandle::new(move || {
            listeners
                .lock()
                .unwrap()
                .retain(|(listener_id, _)| *listener_id != id);
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let counter = Arc::new(Counter::default());
    let persistence = counter.persisted(
        LocalFsStore::for_project("com", "example", "keepsake")?,
        PersistOptions::new(),
    );

    persistence.load().await?;

    let count = counter.increment();
    println!("run #{count}");

    // Let the auto-save task finish before the runtime shuts down
    tokio::time::sleep(Duration::from_millis(50)).await;

    Ok(())
}
