//! File-backed token store.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use super::encryption;
use super::kind::TokenKind;
use super::TokenStore;
use crate::error::{Error, StorageErrorKind};

/// Token store persisted as a JSON object of storage-key to value.
///
/// Values are held decrypted in memory and written through on every
/// mutation. When an encryption key is configured, values are sealed with
/// AES-256-GCM before touching disk; otherwise they are stored in the clear
/// (the original deployment model).
///
/// A durable-write failure is logged and otherwise ignored: the in-memory
/// value still updates, so the running process keeps working and only
/// persistence across restarts is at risk.
pub struct FileTokenStore {
    path: PathBuf,
    encryption_key: Option<SecretString>,
    values: RwLock<HashMap<String, String>>,
}

impl FileTokenStore {
    /// Open (or initialize) the store at `path`.
    ///
    /// A missing file yields an empty store. An entry that fails to decrypt
    /// (e.g. after a key change) is dropped with a warning rather than
    /// failing the whole store; the user re-authenticates for that entry.
    pub fn open(path: impl AsRef<Path>, encryption_key: Option<String>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let encryption_key = encryption_key.map(SecretString::from);

        let mut values = HashMap::new();
        if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|e| Error {
                source: Some(Box::new(e)),
                error_kind: crate::error::ErrorKind::Storage(StorageErrorKind::Io),
            })?;
            let stored: HashMap<String, String> = serde_json::from_str(&raw).map_err(|e| Error {
                source: Some(Box::new(e)),
                error_kind: crate::error::ErrorKind::Storage(StorageErrorKind::Serialization),
            })?;

            for (key, value) in stored {
                match &encryption_key {
                    Some(secret) => match encryption::decrypt(&value, secret.expose_secret()) {
                        Ok(plain) => {
                            values.insert(key, plain);
                        }
                        Err(e) => {
                            warn!("Dropping undecryptable credential entry {}: {}", key, e);
                        }
                    },
                    None => {
                        values.insert(key, value);
                    }
                }
            }
        }

        debug!(
            "Opened credential store at {} with {} entries",
            path.display(),
            values.len()
        );

        Ok(Self {
            path,
            encryption_key,
            values: RwLock::new(values),
        })
    }

    fn persist(&self, values: &HashMap<String, String>) -> Result<(), Error> {
        let mut on_disk: HashMap<&str, String> = HashMap::new();
        for (key, value) in values {
            let stored = match &self.encryption_key {
                Some(secret) => encryption::encrypt(value, secret.expose_secret())?,
                None => value.clone(),
            };
            on_disk.insert(key.as_str(), stored);
        }

        let serialized = serde_json::to_string_pretty(&on_disk).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: crate::error::ErrorKind::Storage(StorageErrorKind::Serialization),
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error {
                    source: Some(Box::new(e)),
                    error_kind: crate::error::ErrorKind::Storage(StorageErrorKind::Io),
                })?;
            }
        }

        fs::write(&self.path, serialized).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: crate::error::ErrorKind::Storage(StorageErrorKind::Io),
        })
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, kind: TokenKind) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(kind.storage_key())
            .cloned()
    }

    fn set(&self, kind: TokenKind, value: Option<String>) {
        let mut values = self
            .values
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match value {
            Some(value) => {
                values.insert(kind.storage_key().to_string(), value);
            }
            None => {
                values.remove(kind.storage_key());
            }
        }
        if let Err(e) = self.persist(&values) {
            warn!(
                "Failed to persist credential store at {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderKind;

    const TEST_KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn temp_store_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "workai-store-{}-{}.json",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn test_set_get_and_reload() {
        let path = temp_store_path("reload");
        {
            let store = FileTokenStore::open(&path, None).unwrap();
            store.set(TokenKind::ZoomAccess, Some("A1".to_string()));
            store.set(TokenKind::ZoomRefresh, Some("R1".to_string()));
        }

        let reopened = FileTokenStore::open(&path, None).unwrap();
        assert_eq!(reopened.get(TokenKind::ZoomAccess), Some("A1".to_string()));
        assert_eq!(reopened.get(TokenKind::ZoomRefresh), Some("R1".to_string()));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_clear_provider_removes_memory_and_disk() {
        let path = temp_store_path("clear");
        let store = FileTokenStore::open(&path, None).unwrap();
        store.set(TokenKind::TeamsAccess, Some("A1".to_string()));
        store.set(TokenKind::TeamsRefresh, Some("R1".to_string()));

        store.clear_provider(ProviderKind::Teams);
        assert_eq!(store.get(TokenKind::TeamsAccess), None);
        assert_eq!(store.get(TokenKind::TeamsRefresh), None);

        let reopened = FileTokenStore::open(&path, None).unwrap();
        assert_eq!(reopened.get(TokenKind::TeamsAccess), None);
        assert_eq!(reopened.get(TokenKind::TeamsRefresh), None);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_values_encrypted_at_rest() {
        let path = temp_store_path("encrypted");
        let store = FileTokenStore::open(&path, Some(TEST_KEY.to_string())).unwrap();
        store.set(TokenKind::SessionBearer, Some("bearer-secret".to_string()));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("bearer-secret"));

        let reopened = FileTokenStore::open(&path, Some(TEST_KEY.to_string())).unwrap();
        assert_eq!(
            reopened.get(TokenKind::SessionBearer),
            Some("bearer-secret".to_string())
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_key_change_drops_entries_instead_of_failing() {
        let path = temp_store_path("keychange");
        {
            let store = FileTokenStore::open(&path, Some(TEST_KEY.to_string())).unwrap();
            store.set(TokenKind::ZoomAccess, Some("A1".to_string()));
        }

        let other_key = "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";
        let reopened = FileTokenStore::open(&path, Some(other_key.to_string())).unwrap();
        assert_eq!(reopened.get(TokenKind::ZoomAccess), None);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let path = temp_store_path("missing");
        let store = FileTokenStore::open(&path, None).unwrap();
        assert_eq!(store.get(TokenKind::SessionBearer), None);
    }
}
