//! Token store: the single source of truth for the bearer credential.
//!
//! The store trusts whatever string it is given. Shape checks live in
//! [`is_jwt_shaped`] and are applied by the session layer, not here.

use secrecy::{ExposeSecret, SecretString};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::RwLock,
};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("token file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("token store lock poisoned")]
    Poisoned,
}

/// Persistence for exactly one bearer token.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, if any.
    fn get(&self) -> Option<SecretString>;

    /// Overwrites the stored token unconditionally.
    ///
    /// # Errors
    /// Returns an error if the token cannot be persisted.
    fn set(&self, token: SecretString) -> Result<(), StoreError>;

    /// Removes the stored token; clearing an empty store is not an error.
    ///
    /// # Errors
    /// Returns an error if the token cannot be removed.
    fn clear(&self) -> Result<(), StoreError>;

    fn is_empty(&self) -> bool {
        self.get().is_none()
    }
}

/// A bearer token is accepted only if it has three non-empty dot-delimited segments.
/// Neither the signature nor the expiry is checked.
#[must_use]
pub fn is_jwt_shaped(token: &str) -> bool {
    let segments: Vec<&str> = token.trim().split('.').collect();
    segments.len() == 3 && segments.iter().all(|segment| !segment.is_empty())
}

/// In-process store, used for ephemeral sessions and tests.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(SecretString::from(token.to_string()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<SecretString> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(_) => {
                warn!("Token store lock poisoned, treating session as signed out");
                None
            }
        }
    }

    fn set(&self, token: SecretString) -> Result<(), StoreError> {
        let mut guard = self.token.write().map_err(|_| StoreError::Poisoned)?;
        *guard = Some(token);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.token.write().map_err(|_| StoreError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

/// File-backed store: one file, one token. A missing or blank file means no token.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<SecretString> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let trimmed = content.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(SecretString::from(trimmed.to_string()))
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %self.path.display(), "Failed to read token file: {err}");
                None
            }
        }
    }

    fn set(&self, token: SecretString) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
        }

        write_private(&self.path, token.expose_secret()).map_err(|err| self.io_error(err))?;
        debug!(path = %self.path.display(), "token stored");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "token cleared");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn jwt_shape_requires_three_segments() {
        assert!(is_jwt_shaped("aaa.bbb.ccc"));
        assert!(is_jwt_shaped(" aaa.bbb.ccc\n"));
        assert!(!is_jwt_shaped(""));
        assert!(!is_jwt_shaped("garbage"));
        assert!(!is_jwt_shaped("aaa.bbb"));
        assert!(!is_jwt_shaped("aaa.bbb.ccc.ddd"));
        assert!(!is_jwt_shaped("aaa..ccc"));
        assert!(!is_jwt_shaped("aaa.bbb."));
    }

    #[test]
    fn memory_store_poisoned_lock_reads_as_signed_out() {
        let store = std::sync::Arc::new(MemoryTokenStore::with_token("a.b.c"));
        let holder = std::sync::Arc::clone(&store);
        let joined = std::thread::spawn(move || {
            let _guard = holder.token.write();
            panic!("lock holder panicked");
        })
        .join();
        assert!(joined.is_err());

        assert!(store.get().is_none());
        assert!(matches!(
            store.set(SecretString::from("d.e.f".to_string())),
            Err(StoreError::Poisoned)
        ));
        assert!(matches!(store.clear(), Err(StoreError::Poisoned)));
    }

    #[test]
    fn memory_store_set_get_clear() -> Result<()> {
        let store = MemoryTokenStore::new();
        assert!(store.is_empty());

        store.set(SecretString::from("one.two.three".to_string()))?;
        assert_eq!(
            store.get().map(|t| t.expose_secret().to_string()),
            Some("one.two.three".to_string())
        );

        store.set(SecretString::from("four.five.six".to_string()))?;
        assert_eq!(
            store.get().map(|t| t.expose_secret().to_string()),
            Some("four.five.six".to_string())
        );

        store.clear()?;
        assert!(store.is_empty());
        store.clear()?;
        Ok(())
    }

    #[test]
    fn file_store_round_trips_through_disk() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("token");
        let store = FileTokenStore::new(&path);
        assert!(store.get().is_none());

        store.set(SecretString::from("aaa.bbb.ccc".to_string()))?;
        assert_eq!(fs::read_to_string(&path)?, "aaa.bbb.ccc");

        // A second handle over the same file sees the token, like a reload.
        let reopened = FileTokenStore::new(&path);
        assert_eq!(
            reopened.get().map(|t| t.expose_secret().to_string()),
            Some("aaa.bbb.ccc".to_string())
        );

        reopened.clear()?;
        assert!(!path.exists());
        assert!(store.get().is_none());
        store.clear()?;
        Ok(())
    }

    #[test]
    fn file_store_treats_blank_file_as_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("token");
        fs::write(&path, "  \n")?;
        assert!(FileTokenStore::new(&path).get().is_none());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn file_store_writes_owner_only_file() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("token");
        FileTokenStore::new(&path).set(SecretString::from("a.b.c".to_string()))?;
        let mode = fs::metadata(&path)?.permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        Ok(())
    }
}
