//! Raw 32-byte key files

use std::path::{Path, PathBuf};

use crate::{Cipher, KEY_LEN, Result, StorageError};

pub struct KeyFile {
    path: PathBuf,
}

impl KeyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Write fresh key material; refuses to clobber unless `force`
    pub fn generate(&self, force: bool) -> Result<Vec<u8>> {
        if self.exists() && !force {
            return Err(StorageError::KeyExists(self.path.display().to_string()));
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let key = Cipher::generate_key();
        std::fs::write(&self.path, &key)?;
        restrict_permissions(&self.path)?;

        tracing::info!(path = %self.path.display(), "Generated encryption key");
        Ok(key)
    }

    pub fn load(&self) -> Result<Vec<u8>> {
        let key = std::fs::read(&self.path)?;
        if key.len() != KEY_LEN {
            return Err(StorageError::InvalidKey {
                expected: KEY_LEN,
                actual: key.len(),
            });
        }
        Ok(key)
    }

    pub fn load_or_generate(&self) -> Result<Vec<u8>> {
        if self.exists() {
            self.load()
        } else {
            self.generate(false)
        }
    }

    pub fn cipher(&self) -> Result<Cipher> {
        Cipher::new(&self.load()?)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let key_file = KeyFile::new(dir.path().join("keys/desens.key"));

        let key = key_file.generate(false).unwrap();
        assert_eq!(key.len(), KEY_LEN);
        assert_eq!(key_file.load().unwrap(), key);
        assert!(key_file.cipher().is_ok());
    }

    #[test]
    fn test_generate_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let key_file = KeyFile::new(dir.path().join("desens.key"));
        let first = key_file.generate(false).unwrap();

        assert!(matches!(
            key_file.generate(false),
            Err(StorageError::KeyExists(_))
        ));
        let second = key_file.generate(true).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_load_or_generate_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let key_file = KeyFile::new(dir.path().join("desens.key"));

        let a = key_file.load_or_generate().unwrap();
        let b = key_file.load_or_generate().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wrong_length_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.key");
        std::fs::write(&path, b"too short").unwrap();

        assert!(matches!(
            KeyFile::new(path).load(),
            Err(StorageError::InvalidKey { actual: 9, .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_key_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let key_file = KeyFile::new(dir.path().join("desens.key"));
        key_file.generate(false).unwrap();

        let mode = std::fs::metadata(key_file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
