use anyhow::{Context, Result, bail};
use desens_sources::FileEnumerator;
use desens_storage::KeyFile;
use std::path::Path;

pub async fn handle(input: &Path, key_file: &Path) -> Result<()> {
    let cipher = KeyFile::new(key_file)
        .cipher()
        .with_context(|| format!("Failed to load key {}", key_file.display()))?;

    let files = if input.is_dir() {
        FileEnumerator::new(["enc"])
            .with_recursive(false)
            .enumerate(input)?
    } else {
        vec![input.to_path_buf()]
    };
    if files.is_empty() {
        bail!("No .enc files found in {}", input.display());
    }

    let mut failed = 0;
    for path in &files {
        match cipher.decrypt_file(path).await {
            Ok(target) => println!("✓ {} -> {}", path.display(), target.display()),
            Err(e) => {
                eprintln!("✗ {}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} file(s) could not be decrypted", failed, files.len());
    }

    Ok(())
}
