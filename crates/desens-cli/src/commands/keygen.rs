use anyhow::Result;
use desens_storage::{KeyFile, StorageError};
use std::path::Path;

pub fn handle(path: &Path, force: bool) -> Result<()> {
    match KeyFile::new(path).generate(force) {
        Ok(_) => {
            println!("✓ Wrote key to {}", path.display());
            println!("  Keep it secret; encrypted outputs cannot be read without it");
            Ok(())
        }
        Err(e @ StorageError::KeyExists(_)) => {
            anyhow::bail!("{} (use --force to replace it)", e)
        }
        Err(e) => Err(e.into()),
    }
}
