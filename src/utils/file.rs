use std::fs;
use std::path::Path;

use log::debug;

use crate::error::Result;

/// Create a directory if it doesn't exist
pub fn ensure_directory_exists(dir: &Path) -> Result<()> {
    if !dir.as_os_str().is_empty() && !dir.exists() {
        debug!("Directory {} does not exist. Creating it now.", dir.display());
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Write `content` to `path`, creating parent directories.
///
/// The text goes to a sibling temporary file first and is renamed into
/// place, falling back to a plain write if the rename fails.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory_exists(parent)?;
    }

    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));
    fs::write(&tmp_path, content)?;

    match fs::rename(&tmp_path, path) {
        Ok(_) => Ok(()),
        Err(e) => {
            debug!("Rename failed for {}, writing directly: {}", path.display(), e);
            let _ = fs::remove_file(&tmp_path);
            fs::write(path, content)?;
            Ok(())
        }
    }
}
