//! Delivery of a finished export payload as a file.

use std::path::PathBuf;

use crate::error::ScraperError;

/// Receives a finished export and turns it into a file the user can open.
pub trait Downloader {
    /// # Errors
    ///
    /// Returns [`ScraperError::Download`] if the payload cannot be stored.
    fn download(&self, filename: &str, payload: &[u8]) -> Result<PathBuf, ScraperError>;
}

/// Writes exports into a fixed directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectoryDownloader {
    dir: PathBuf,
}

impl DirectoryDownloader {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Downloader for DirectoryDownloader {
    fn download(&self, filename: &str, payload: &[u8]) -> Result<PathBuf, ScraperError> {
        let path = self.dir.join(filename);
        let io_err = |source| ScraperError::Download {
            path: path.display().to_string(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        std::fs::write(&path, payload).map_err(io_err)?;
        tracing::info!(path = %path.display(), bytes = payload.len(), "export written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_payload_into_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let downloader = DirectoryDownloader::new(tmp.path().join("exports"));
        let path = downloader.download("shops.csv", b"a,b").unwrap();
        assert_eq!(path, tmp.path().join("exports").join("shops.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), b"a,b");
    }

    #[test]
    fn reports_unwritable_target() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let downloader = DirectoryDownloader::new(&blocker);
        let err = downloader.download("shops.csv", b"x").unwrap_err();
        assert!(matches!(err, ScraperError::Download { .. }), "got: {err:?}");
    }
}
