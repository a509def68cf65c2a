//! # Filesystem-backed key/value store
//!
//! [`FileStore`] is the [`KeyValueStore`] used by native builds. Each key is
//! one file directly under the base directory, holding the raw value.
//!
//! ```text
//! <base_dir>/
//! ├── token      # bearer token
//! └── user       # JSON user object
//! ```
//!
//! Use `dirs::data_dir()` joined with `studenthub` for a platform-appropriate
//! base (e.g. `~/.local/share/studenthub/` on Linux).

use std::path::PathBuf;

use crate::kv::{KeyValueStore, StoreError};

/// Filesystem-backed KeyValueStore for native persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        // Keys are fixed identifiers; anything path-like is flattened.
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base.join(safe)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.base)?;
        std::fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) {
        let _ = std::fs::remove_file(self.key_path(key));
    }
}
