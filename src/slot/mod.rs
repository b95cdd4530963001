//! Durable key-value slots that hold one serialized collection per key.
//!
//! `FileSlots` keeps each slot as a JSON file on disk. `MemorySlots` keeps them in memory and is
//! used to run the stores without touching the filesystem.

mod file;
mod memory;

pub use file::FileSlots;
pub use memory::MemorySlots;

use crate::Result;
use std::path::PathBuf;

/// A key-value backend. Each value is an opaque blob that is always replaced as a whole.
#[async_trait::async_trait]
pub trait Slots: Send + Sync {
    /// Returns the raw blob stored under `key`, or `None` if nothing has been stored yet. The
    /// bytes are not checked here; a blob that is not valid UTF-8 is the reader's problem.
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replaces the blob stored under `key`.
    async fn write(&self, key: &str, blob: &str) -> Result<()>;

    /// Keeps a copy of a blob that could not be loaded before it is overwritten. Returns where it
    /// was kept, if anywhere.
    async fn quarantine(&self, _key: &str, _blob: &[u8]) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}
