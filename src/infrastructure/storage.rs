use std::fs;
use std::path::{Path, PathBuf};

/// Resolve the directory uploads are spooled into, creating it when configured
pub fn resolve_upload_dir(configured: Option<&Path>) -> std::io::Result<PathBuf> {
    match configured {
        Some(dir) => {
            ensure_dir(dir)?;
            Ok(dir.to_path_buf())
        }
        None => Ok(std::env::temp_dir()),
    }
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
