use std::sync::Mutex;

use rustc_hash::FxHashMap;

use crate::store::KeyValueStore;

/// In-process store for tests and demos.
///
/// Every read and write is recorded so callers can assert on access
/// patterns and persisted payloads.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<FxHashMap<String, String>>,
    reads: Mutex<Vec<String>>,
    writes: Mutex<Vec<(String, String)>>,
}

// Implementations

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a payload without it counting as a write.
    pub fn seed(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.lock().unwrap().insert(key.into(), value.into());
    }

    /// The payload currently stored under `key`, if any.
    pub fn payload(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn read_count(&self) -> usize {
        self.reads.lock().unwrap().len()
    }

    /// Keys read so far, oldest first.
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    /// `(key, payload)` pairs written so far, oldest first.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.reads.lock().unwrap().push(key.to_string());

        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        self.writes
            .lock()
            .unwrap()
            .push((key.to_string(), value.to_string()));

        Ok(())
    }
}
