//! Local filesystem adapter using std::fs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use progen_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{ProgenError, ProgenResult},
};
use tracing::trace;
use walkdir::WalkDir;

/// Production filesystem implementation using `std::fs`.
///
/// Staging directories are created under the system temp directory unless a
/// root is given with [`LocalFilesystem::with_staging_root`].
#[derive(Debug, Clone, Default)]
pub struct LocalFilesystem {
    staging_root: Option<PathBuf>,
}

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_staging_root(root: impl Into<PathBuf>) -> Self {
        Self {
            staging_root: Some(root.into()),
        }
    }
}

impl Filesystem for LocalFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_dir(&self, path: &Path) -> ProgenResult<Vec<String>> {
        let entries = fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(path, e, "read directory entry"))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn create_dir_all(&self, path: &Path) -> ProgenResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn read_file(&self, path: &Path) -> ProgenResult<Vec<u8>> {
        fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> ProgenResult<()> {
        fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> ProgenResult<()> {
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(to, e, "copy file"))
    }

    fn copy_dir_all(&self, from: &Path, to: &Path) -> ProgenResult<()> {
        for entry in WalkDir::new(from).follow_links(false) {
            let entry = entry.map_err(|e| {
                let at = e.path().unwrap_or(from).to_path_buf();
                map_io_error(&at, e.into(), "walk directory")
            })?;

            let relative = entry
                .path()
                .strip_prefix(from)
                .map_err(|e| ProgenError::Internal {
                    message: format!("{} is outside {}: {e}", entry.path().display(), from.display()),
                })?;
            let dest = to.join(relative);

            if entry.file_type().is_dir() {
                self.create_dir_all(&dest)?;
            } else {
                if let Some(parent) = dest.parent() {
                    self.create_dir_all(parent)?;
                }
                trace!(from = %entry.path().display(), to = %dest.display(), "Copying");
                self.copy_file(entry.path(), &dest)?;
            }
        }
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> ProgenResult<()> {
        fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn create_staging_dir(&self, prefix: &str) -> ProgenResult<PathBuf> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        let dir = match &self.staging_root {
            Some(root) => builder
                .tempdir_in(root)
                .map_err(|e| map_io_error(root, e, "create staging directory"))?,
            None => builder
                .tempdir()
                .map_err(|e| map_io_error(&std::env::temp_dir(), e, "create staging directory"))?,
        };
        // Removal is the caller's job; see `Filesystem::create_staging_dir`.
        Ok(dir.keep())
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ProgenError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
