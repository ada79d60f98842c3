use crate::core::error::{RelcopyError, RelcopyResult};
use std::path::{Path, PathBuf};

/// Get the Relcopy cache directory
///
/// Platform-specific locations:
/// - Windows: %LOCALAPPDATA%\relcopy
/// - Linux: ~/.cache/relcopy
/// - macOS: ~/Library/Caches/relcopy
///
/// Falls back to the system temp directory when no cache directory is known.
pub fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("relcopy")
}

/// Default location where assets are staged between download and upload.
pub fn default_staging_dir() -> PathBuf {
    cache_dir().join("staging")
}

/// Ensure a directory exists, creating it and its parents if missing.
pub fn ensure_dir(path: &Path) -> RelcopyResult<()> {
    if !path.is_dir() {
        std::fs::create_dir_all(path).map_err(|source| RelcopyError::LocalIo {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_staging_dir_is_under_cache_dir() {
        let staging = default_staging_dir();
        assert!(staging.starts_with(cache_dir()));
        assert!(staging.ends_with("relcopy/staging"));
    }

    #[test]
    fn test_ensure_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");

        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
        // Idempotent
        ensure_dir(&dir).unwrap();
    }

    #[test]
    fn test_ensure_dir_over_file_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("occupied");
        std::fs::write(&file, b"x").unwrap();

        let err = ensure_dir(&file).unwrap_err();
        assert!(matches!(err, RelcopyError::LocalIo { .. }));
    }
}
