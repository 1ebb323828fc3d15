//! Directory-backed cart slot.
//!
//! Each key is stored as `<dir>/<key>.json`. Writes go to a temporary file in
//! the same directory and are renamed into place, so a crash never leaves a
//! half-written cart behind.

use std::io::ErrorKind;
use std::path::PathBuf;

use cartwheel_core::{CartSlot, SlotError};
use uuid::Uuid;

/// [`CartSlot`] storing each key as a JSON file in a directory.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Create a slot rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing `key`. Keys are restricted so they cannot escape `dir`.
    fn path_for(&self, key: &str) -> Result<PathBuf, SlotError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(SlotError::Unavailable(format!("invalid slot key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl CartSlot for FileSlot {
    async fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &str, value: String) -> Result<(), SlotError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let tmp_path = self.dir.join(format!(".{key}-{}.tmp", Uuid::new_v4()));
        tokio::fs::write(&tmp_path, value).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        Ok(())
    }
}
