//! Implements the `Slots` trait using in-memory data.

use crate::slot::Slots;
use crate::Result;
use anyhow::bail;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Holds slots in memory. Writes can be made to fail, to exercise what a store does when its
/// storage is unavailable.
#[derive(Debug, Default)]
pub struct MemorySlots {
    data: Mutex<HashMap<String, Vec<u8>>>,
    quarantined: Mutex<Vec<(String, Vec<u8>)>>,
    fail_writes: AtomicBool,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates slots seeded with `key` holding `blob`.
    pub fn with(key: &str, blob: impl AsRef<[u8]>) -> Self {
        let slots = Self::default();
        slots.lock().insert(key.to_string(), blob.as_ref().to_vec());
        slots
    }

    /// The blob currently held under `key`, decoded lossily.
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock()
            .get(key)
            .map(|blob| String::from_utf8_lossy(blob).into_owned())
    }

    /// Every `(key, blob)` pair handed to `quarantine`, oldest first.
    pub fn quarantined(&self) -> Vec<(String, Vec<u8>)> {
        match self.quarantined.lock() {
            Ok(q) => q.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// When `fail` is true, every following `write` returns an error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        match self.data.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait::async_trait]
impl Slots for MemorySlots {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.lock().get(key).cloned())
    }

    async fn write(&self, key: &str, blob: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("Storage is unavailable, unable to write slot '{key}'");
        }
        self.lock().insert(key.to_string(), blob.as_bytes().to_vec());
        Ok(())
    }

    async fn quarantine(&self, key: &str, blob: &[u8]) -> Result<Option<PathBuf>> {
        let mut q = match self.quarantined.lock() {
            Ok(q) => q,
            Err(poisoned) => poisoned.into_inner(),
        };
        q.push((key.to_string(), blob.to_vec()));
        Ok(None)
    }
}
