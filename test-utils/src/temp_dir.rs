//! Temporary data directories for file persistence tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::TestError;

/// A fresh directory under the system temp dir, removed with everything in it on drop.
pub struct TempDataDir {
    dir: TempDir,
}

impl TempDataDir {
    /// Creates a fresh, empty directory.
    ///
    /// # Returns
    /// - `Ok(TempDataDir)` - The created directory
    /// - `Err(TestError::Io)` - The directory could not be created
    pub fn new() -> Result<Self, TestError> {
        let dir = tempfile::Builder::new().prefix("warden-test-").tempdir()?;
        Ok(Self { dir })
    }

    /// Path of the directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a file inside the directory.
    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_directory_on_drop() -> Result<(), TestError> {
        let dir = TempDataDir::new()?;
        let path = dir.path().to_path_buf();
        std::fs::write(dir.join("file.json"), "{}")?;
        assert!(path.exists());

        drop(dir);

        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn creates_distinct_directories() -> Result<(), TestError> {
        let a = TempDataDir::new()?;
        let b = TempDataDir::new()?;
        assert_ne!(a.path(), b.path());
        Ok(())
    }
}
