//! File-backed durable credential storage.
//!
//! A single file holds the credential string; absence means logged out.

use smartkids_core::error::StoreError;
use smartkids_core::gateway::CredentialStore;
use smartkids_core::types::Credential;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credential>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Credential::new(token)))
                }
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, credential.as_str())?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileCredentialStore {
        FileCredentialStore::new(dir.path().join("credential"))
    }

    #[test]
    fn load_without_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&Credential::new("token-123")).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.as_str(), "token-123");
    }

    #[test]
    fn clear_removes_credential_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.save(&Credential::new("token")).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn blank_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(dir.path().join("credential"), "  \n").unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
