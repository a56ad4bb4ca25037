//! Durable credential persistence.
//!
//! The session must survive a full process restart, so the access token
//! and user id are written to client-local storage. This module defines
//! the [`CredentialStore`] seam plus the two implementations: a JSON
//! file under the user's home directory (production) and an in-memory
//! cell (tests, or embedders that opt out of persistence).
//!
//! # Write discipline
//!
//! Four call sites mutate the store — login, refresh, logout, restore —
//! and all of them follow the same rule: compute the complete new record
//! from the session state just established, then overwrite (or clear)
//! in one call. The store is a last-writer-wins register; there is no
//! read-modify-write, so no locking is needed beyond what each
//! implementation does internally.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use duckcross_api::UserId;
use serde::{Deserialize, Serialize};

/// Errors from reading or writing the persisted credential.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("credential storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("persisted credential is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The persisted record. Serialized with the contract's fixed key names
/// (`accessToken`, `userId`) — the same names every client build uses,
/// so an upgrade never strands a stored session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCredential {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
}

/// Where the session's credential lives between process runs.
///
/// Implementations are synchronous: storage is client-local and small,
/// and keeping it sync means the session manager's only suspension
/// points are its network calls.
pub trait CredentialStore: Send + Sync + 'static {
    /// Reads the persisted credential. `Ok(None)` means "never logged
    /// in here" and is not an error.
    fn load(&self) -> Result<Option<StoredCredential>, StoreError>;

    /// Overwrites the persisted credential.
    fn save(&self, credential: &StoredCredential) -> Result<(), StoreError>;

    /// Removes the persisted credential. Clearing an already-empty
    /// store succeeds.
    fn clear(&self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// FileCredentialStore
// ---------------------------------------------------------------------------

/// File-backed [`CredentialStore`]: one JSON document at a fixed path,
/// `~/.duckcross/credentials.json` by default.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// A store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A store at the default location under the user's home directory.
    pub fn with_default_path() -> Self {
        Self::new(Self::default_path())
    }

    /// Default credential file path: `~/.duckcross/credentials.json`.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home)
            .join(".duckcross")
            .join("credentials.json")
    }

    /// The path this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<StoredCredential>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, credential: &StoredCredential) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(credential)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryCredentialStore
// ---------------------------------------------------------------------------

/// In-memory [`CredentialStore`]. Nothing survives the process; used in
/// tests and by embedders that handle persistence themselves.
///
/// Clones share the underlying cell, so a test can hand one clone to a
/// session manager and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    cell: Arc<Mutex<Option<StoredCredential>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<StoredCredential>, StoreError> {
        Ok(self.cell.lock().unwrap().clone())
    }

    fn save(&self, credential: &StoredCredential) -> Result<(), StoreError> {
        *self.cell.lock().unwrap() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.cell.lock().unwrap() = None;
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(token: &str, id: u64) -> StoredCredential {
        StoredCredential {
            access_token: token.to_string(),
            user_id: Some(UserId(id)),
        }
    }

    // =====================================================================
    // FileCredentialStore
    // =====================================================================

    #[test]
    fn test_file_store_load_absent_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("creds.json"));

        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("creds.json"));

        store.save(&credential("tok1", 7)).unwrap();

        assert_eq!(store.load().unwrap(), Some(credential("tok1", 7)));
    }

    #[test]
    fn test_file_store_creates_parent_dirs() {
        // The default path is nested (~/.duckcross/...), so save must
        // work on a machine that has never run the client.
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(
            dir.path().join("deep").join("nested").join("creds.json"),
        );

        store.save(&credential("tok1", 7)).unwrap();

        assert!(store.path().exists());
    }

    #[test]
    fn test_file_store_save_overwrites() {
        // Last writer wins: a save replaces the whole record.
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("creds.json"));

        store.save(&credential("tok1", 7)).unwrap();
        store.save(&credential("tok2", 7)).unwrap();

        assert_eq!(
            store.load().unwrap().unwrap().access_token,
            "tok2"
        );
    }

    #[test]
    fn test_file_store_uses_fixed_key_names() {
        // The on-disk keys are part of the contract between client
        // versions.
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("creds.json"));
        store.save(&credential("tok1", 7)).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"accessToken\""));
        assert!(raw.contains("\"userId\""));
    }

    #[test]
    fn test_file_store_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("creds.json"));
        store.save(&credential("tok1", 7)).unwrap();

        store.clear().unwrap();

        assert!(!store.path().exists());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("creds.json"));

        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("creds.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = FileCredentialStore::new(path);

        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_stored_credential_without_user_id() {
        // A refresh can persist a token before any login stored an id.
        let json = r#"{ "accessToken": "tok1" }"#;
        let cred: StoredCredential = serde_json::from_str(json).unwrap();
        assert_eq!(cred.access_token, "tok1");
        assert_eq!(cred.user_id, None);
    }

    // =====================================================================
    // MemoryCredentialStore
    // =====================================================================

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save(&credential("tok1", 7)).unwrap();
        assert_eq!(store.load().unwrap(), Some(credential("tok1", 7)));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
