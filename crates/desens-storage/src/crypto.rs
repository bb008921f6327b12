//! AES-256-GCM payload encryption
//!
//! An encrypted blob is the 12-byte nonce followed by the ciphertext and
//! its 16-byte tag. A fresh nonce is drawn for every blob.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use rand::RngCore;
use std::path::{Path, PathBuf};

use crate::{Result, StorageError};

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;

pub struct Cipher {
    inner: Aes256Gcm,
}

impl Cipher {
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() != KEY_LEN {
            return Err(StorageError::InvalidKey {
                expected: KEY_LEN,
                actual: key.len(),
            });
        }

        let inner = Aes256Gcm::new_from_slice(key).map_err(|_| StorageError::InvalidKey {
            expected: KEY_LEN,
            actual: key.len(),
        })?;

        Ok(Self { inner })
    }

    /// Fresh random key material
    pub fn generate_key() -> Vec<u8> {
        let mut key = vec![0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);
        key
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<Vec<u8>> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .inner
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| StorageError::Encryption(e.to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    /// Wrong key, truncated blob and tampered data all fail the same way
    pub fn decrypt(&self, blob: &[u8]) -> Result<String> {
        if blob.len() < NONCE_LEN {
            return Err(StorageError::Decryption(format!(
                "blob too short ({} bytes)",
                blob.len()
            )));
        }

        let (nonce, ciphertext) = blob.split_at(NONCE_LEN);
        let plaintext = self
            .inner
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| StorageError::Decryption("authentication failed".to_string()))?;

        String::from_utf8(plaintext)
            .map_err(|e| StorageError::Decryption(format!("not UTF-8 text: {}", e)))
    }

    /// Decrypt `<dir>/<stem>.enc` into `<dir>/<stem>_decrypted.txt`
    pub async fn decrypt_file(&self, path: &Path) -> Result<PathBuf> {
        let blob = tokio::fs::read(path).await?;
        let text = self.decrypt(&blob)?;

        let target = decrypted_path(path);
        tokio::fs::write(&target, text).await?;
        tracing::debug!(
            source = %path.display(),
            target = %target.display(),
            "Decrypted file"
        );

        Ok(target)
    }
}

pub fn decrypted_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}_decrypted.txt", stem))
}
