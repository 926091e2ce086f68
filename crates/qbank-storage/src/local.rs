//! Legacy local uploads directory.
//!
//! Records predating the cloud-storage migration kept their files on local
//! disk under a configured uploads directory. This is the last retrieval
//! strategy, tried only after the provider has failed every attempt.

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::locator::LocatorError;

/// Read-only view over the legacy uploads directory.
#[derive(Clone)]
pub struct LocalUploads {
    base_path: PathBuf,
}

impl LocalUploads {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Resolve a stored filename to a path inside the uploads directory.
    ///
    /// Filenames come from user uploads, so traversal sequences and absolute
    /// paths are rejected rather than resolved.
    fn resolve(&self, file_name: &str) -> Result<PathBuf, LocatorError> {
        if file_name.is_empty()
            || file_name.contains("..")
            || Path::new(file_name).is_absolute()
        {
            return Err(LocatorError::InvalidFileName(file_name.to_string()));
        }
        Ok(self.base_path.join(file_name))
    }

    /// Whether a legacy file exists for this filename.
    pub async fn exists(&self, file_name: &str) -> bool {
        match self.resolve(file_name) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Read a legacy file's bytes.
    pub async fn read(&self, file_name: &str) -> Result<Vec<u8>, LocatorError> {
        let path = self.resolve(file_name)?;
        fs::read(&path).await.map_err(|e| {
            LocatorError::LocalRead(format!("Failed to read {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_read_existing_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("legacy.pdf"), b"legacy bytes").unwrap();

        let uploads = LocalUploads::new(dir.path());
        assert!(uploads.exists("legacy.pdf").await);
        assert_eq!(uploads.read("legacy.pdf").await.unwrap(), b"legacy bytes");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempdir().unwrap();
        let uploads = LocalUploads::new(dir.path());
        assert!(!uploads.exists("nope.pdf").await);
        assert!(uploads.read("nope.pdf").await.is_err());
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let dir = tempdir().unwrap();
        let uploads = LocalUploads::new(dir.path());
        assert!(!uploads.exists("../etc/passwd").await);
        assert!(matches!(
            uploads.read("../etc/passwd").await,
            Err(LocatorError::InvalidFileName(_))
        ));
        assert!(!uploads.exists("").await);
    }
}
