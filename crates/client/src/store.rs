//! Local snapshot persistence for client-side state.
//!
//! The session token and the cart are the only state that lives on this
//! device. Both are stored as JSON snapshot files inside a [`StateDir`];
//! every write lands in a temp file first and is renamed into place, so a
//! reader never observes a partially-written snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// File names for the persisted snapshots.
pub mod keys {
    /// Key for the persisted session token.
    pub const TOKEN: &str = "session.json";

    /// Key for the persisted cart snapshot.
    pub const CART: &str = "cart.json";
}

/// Errors from reading or writing local state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("state decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A directory of JSON snapshot files.
///
/// Constructed once at session start and handed to the components that
/// persist through it. Cloning is cheap; all clones write to the same
/// directory.
#[derive(Debug, Clone)]
pub struct StateDir {
    root: PathBuf,
}

impl StateDir {
    /// Open (creating if needed) a state directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StateError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Path of a snapshot file inside the directory.
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Load a snapshot, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or decoded.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, StateError> {
        let path = self.path(name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Write a snapshot atomically (temp file + rename).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the filesystem write fails.
    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StateError> {
        let raw = serde_json::to_string_pretty(value)?;
        let tmp = self.path(&format!("{name}.tmp"));
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, self.path(name))?;
        Ok(())
    }

    /// Remove a snapshot. Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error on filesystem failures other than "not found".
    pub fn remove(&self, name: &str) -> Result<(), StateError> {
        match fs::remove_file(self.path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a snapshot file exists.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }
}

impl AsRef<Path> for StateDir {
    fn as_ref(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU32, Ordering};

    static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

    /// A unique throwaway state directory under the system temp dir.
    pub(crate) fn temp_state_dir(label: &str) -> StateDir {
        let seq = DIR_SEQ.fetch_add(1, Ordering::Relaxed);
        let root = std::env::temp_dir().join(format!(
            "bobr-test-{label}-{}-{seq}",
            std::process::id()
        ));
        StateDir::open(root).expect("create temp state dir")
    }

    #[test]
    fn test_load_missing_is_none() {
        let store = temp_state_dir("missing");
        let loaded: Option<Vec<String>> = store.load("nothing.json").expect("load");
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let store = temp_state_dir("roundtrip");
        let value = vec!["a".to_string(), "b".to_string()];
        store.save("list.json", &value).expect("save");
        let loaded: Option<Vec<String>> = store.load("list.json").expect("load");
        assert_eq!(loaded, Some(value));
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let store = temp_state_dir("overwrite");
        store.save("n.json", &1_u32).expect("save");
        store.save("n.json", &2_u32).expect("save");
        let loaded: Option<u32> = store.load("n.json").expect("load");
        assert_eq!(loaded, Some(2));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = temp_state_dir("remove");
        store.save("gone.json", &0_u32).expect("save");
        store.remove("gone.json").expect("remove");
        assert!(!store.exists("gone.json"));
        store.remove("gone.json").expect("remove again");
    }
}
