// src/infrastructure/file_store.rs
use crate::application::KeyValueStore;
use crate::constants::APP_DIR_NAME;
use crate::domain::StoreError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Key-value store keeping each key in its own `<key>.json` file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Store under the platform's local data directory
    pub fn in_data_dir() -> Result<Self, StoreError> {
        let base = dirs::data_local_dir()
            .ok_or_else(|| StoreError::Unavailable("no local data directory".to_string()))?;
        Ok(Self::new(base.join(APP_DIR_NAME)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }

    #[instrument(level = "debug", skip(self, value))]
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.key_path(key);
        // Write then rename so a crash never leaves half a table behind
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), "Saved");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
            debug!(path = %path.display(), "Deleted");
        }
        Ok(())
    }
}
