//! File-backed store for the Gemini API key.
//!
//! The application's single piece of persisted state: read once at
//! startup, written when the user submits a key. Lives under
//! `~/.interview-assist/` by default. The key is only ever sent to the
//! Gemini endpoint, in the `x-goog-api-key` header.

use std::path::PathBuf;

use secrecy::SecretString;
use tokio::fs;

use crate::error::KeystoreError;

/// File name holding the key inside the base directory.
const KEY_FILE: &str = "gemini_api_key";

/// File-backed credential store.
pub struct Keystore {
    base_path: PathBuf,
}

impl Keystore {
    /// Create a keystore rooted at `base_path`.
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Default location under the user's home directory.
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".interview-assist")
    }

    fn key_path(&self) -> PathBuf {
        self.base_path.join(KEY_FILE)
    }

    /// Load the stored key, if any. An empty or whitespace-only file
    /// counts as no key.
    pub async fn load(&self) -> Result<Option<SecretString>, KeystoreError> {
        let path = self.key_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path).await?;
        let trimmed = contents.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(SecretString::from(trimmed.to_string())))
        }
    }

    /// Persist a key, creating the directory if needed. Overwrites any
    /// previously stored value.
    pub async fn store(&self, key: &str) -> Result<(), KeystoreError> {
        fs::create_dir_all(&self.base_path).await?;
        fs::write(self.key_path(), key.trim()).await?;
        Ok(())
    }

    /// Remove the stored key, if present.
    pub async fn clear(&self) -> Result<(), KeystoreError> {
        let path = self.key_path();
        if path.exists() {
            fs::remove_file(path).await?;
        }
        Ok(())
    }
}
