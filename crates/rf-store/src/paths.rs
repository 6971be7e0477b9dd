//! OS-specific path resolution for the pattern library

use rf_types::{AppError, AppResult};
use std::path::{Path, PathBuf};

/// Get the data directory.
///
/// Priority:
/// 1. Runtime override via `REGEXFORGE_DIR` environment variable
/// 2. `~/.regexforge/`
pub fn data_dir() -> AppResult<PathBuf> {
    if let Ok(dir) = std::env::var("REGEXFORGE_DIR") {
        return Ok(PathBuf::from(dir));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| AppError::Config("Could not determine home directory".to_string()))?;
    Ok(home.join(".regexforge"))
}

/// Get the pattern library file path
pub fn patterns_file() -> AppResult<PathBuf> {
    Ok(data_dir()?.join("patterns.json"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir_exists(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| {
            AppError::Config(format!(
                "Failed to create directory {}: {}",
                path.display(),
                e
            ))
        })?;
    }
    Ok(())
}
