//! Generic key-value blob storage.
//!
//! The cart persists through this interface, which mirrors a browser's
//! localStorage: synchronous string-keyed blobs, and absence is a normal
//! outcome rather than an error. Storage failures never surface to
//! callers; a blob that cannot be read or written is treated as absent
//! and logged.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::warn;

/// A synchronous string-keyed blob store.
///
/// Access is never interleaved for the same key within one logical flow,
/// so implementations need no coordination beyond their own interior
/// mutability.
pub trait KeyValueStore: Send + Sync {
    /// Read the blob for `key`, if present and readable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write the blob for `key`, replacing any prior value.
    fn set(&self, key: &str, value: &str);

    /// Erase the blob for `key`. Erasing an absent key is a no-op.
    fn remove(&self, key: &str);
}

// =============================================================================
// In-memory store
// =============================================================================

/// Ephemeral in-memory store for tests and hosts without durable storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}

// =============================================================================
// File-backed store
// =============================================================================

/// Durable store keeping one file per key under a data directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are internal names ("cart"), never user input, but keep
        // them confined to the data directory regardless.
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(key, error = %e, "failed to read blob, treating as absent");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::write(self.path_for(key), value) {
            warn!(key, error = %e, "failed to write blob");
        }
    }

    fn remove(&self, key: &str) {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(key, error = %e, "failed to remove blob"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> (FileStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("thistle-store-{}", uuid::Uuid::new_v4()));
        (FileStore::open(&dir).unwrap(), dir)
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("cart"), None);
        store.set("cart", "[]");
        assert_eq!(store.get("cart").as_deref(), Some("[]"));
        store.remove("cart");
        assert_eq!(store.get("cart"), None);
        // removing an absent key is a no-op
        store.remove("cart");
    }

    #[test]
    fn test_file_store_roundtrip() {
        let (store, dir) = temp_store();
        assert_eq!(store.get("cart"), None);
        store.set("cart", r#"[{"id":"a"}]"#);
        assert_eq!(store.get("cart").as_deref(), Some(r#"[{"id":"a"}]"#));
        store.remove("cart");
        assert_eq!(store.get("cart"), None);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let (store, dir) = temp_store();
        store.set("cart", "persisted");
        drop(store);
        let reopened = FileStore::open(&dir).unwrap();
        assert_eq!(reopened.get("cart").as_deref(), Some("persisted"));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let (store, dir) = temp_store();
        store.set("../escape", "x");
        assert_eq!(store.get("../escape").as_deref(), Some("x"));
        assert!(dir.join("___escape.json").exists());
        std::fs::remove_dir_all(dir).unwrap();
    }
}
