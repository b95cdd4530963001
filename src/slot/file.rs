//! Implements the `Slots` trait with one JSON file per key.

use crate::backup::Backup;
use crate::slot::Slots;
use crate::{utils, Result};
use std::path::{Path, PathBuf};
use tracing::trace;

/// Stores slot `key` at `{dir}/{key}.json`. Writes go to a temporary file that is then renamed
/// over the old one, so a reader sees either the previous blob or the new one.
#[derive(Debug, Clone)]
pub struct FileSlots {
    dir: PathBuf,
    backup: Backup,
}

impl FileSlots {
    pub fn new(dir: impl Into<PathBuf>, backup: Backup) -> Self {
        Self {
            dir: dir.into(),
            backup,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The path of the file holding slot `key`.
    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{key}.json.tmp"))
    }
}

#[async_trait::async_trait]
impl Slots for FileSlots {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        trace!("read slot {}", path.display());
        utils::read_if_exists(&path).await
    }

    async fn write(&self, key: &str, blob: &str) -> Result<()> {
        let temp = self.temp_path(key);
        trace!("write slot {}", self.path(key).display());
        utils::write(&temp, blob).await?;
        utils::rename(&temp, self.path(key)).await
    }

    async fn quarantine(&self, key: &str, blob: &[u8]) -> Result<Option<PathBuf>> {
        self.backup.save_corrupt(key, blob).await.map(Some)
    }
}
