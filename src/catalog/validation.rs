//! Source path validation.
//!
//! Checks that a partition path is usable before any read is attempted, so the loader
//! can report a precise reason for a skipped partition.

use crate::error::{Result, ScreenerError};
use std::path::Path;

/// Validate that a source path exists, is a regular non-empty file and is readable.
pub async fn validate_source_path(path: &Path) -> Result<u64> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ScreenerError::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(ScreenerError::file_error("Failed to read file metadata", e)),
    };

    if !metadata.is_file() {
        return Err(ScreenerError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    if metadata.len() == 0 {
        return Err(ScreenerError::EmptySource {
            path: path.to_path_buf(),
        });
    }

    tokio::fs::File::open(path)
        .await
        .map_err(|e| ScreenerError::file_error("Cannot open source for reading", e))?;

    Ok(metadata.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[tokio::test]
    async fn test_valid_source() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "id,title\n").unwrap();
        let size = validate_source_path(file.path()).await.unwrap();
        assert_eq!(size, 9);
    }

    #[tokio::test]
    async fn test_missing_source() {
        let dir = TempDir::new().unwrap();
        let result = validate_source_path(&dir.path().join("absent.csv")).await;
        assert!(matches!(result, Err(ScreenerError::SourceNotFound { .. })));
    }

    #[tokio::test]
    async fn test_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        let result = validate_source_path(dir.path()).await;
        assert!(matches!(result, Err(ScreenerError::NotAFile { .. })));
    }

    #[tokio::test]
    async fn test_empty_source_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        let result = validate_source_path(file.path()).await;
        assert!(matches!(result, Err(ScreenerError::EmptySource { .. })));
    }
}
