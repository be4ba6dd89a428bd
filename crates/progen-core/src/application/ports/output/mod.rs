//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `progen-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::CommandLine;
use crate::error::ProgenResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `progen_adapters::filesystem::LocalFilesystem` (production)
/// - `progen_adapters::filesystem::MemoryFilesystem` (testing)
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Check if path exists (file or directory).
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Names of the immediate entries of a directory.
    fn list_dir(&self, path: &Path) -> ProgenResult<Vec<String>>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ProgenResult<()>;

    /// Read a whole file.
    fn read_file(&self, path: &Path) -> ProgenResult<Vec<u8>>;

    /// Write content to a file, replacing it.
    fn write_file(&self, path: &Path, content: &[u8]) -> ProgenResult<()>;

    /// Copy one file; the destination's parent must exist.
    fn copy_file(&self, from: &Path, to: &Path) -> ProgenResult<()>;

    /// Recursively copy a directory, merging into (and overwriting inside)
    /// any existing destination.
    fn copy_dir_all(&self, from: &Path, to: &Path) -> ProgenResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ProgenResult<()>;

    /// Create a fresh, uniquely named scratch directory and return its path.
    ///
    /// The caller owns it and is responsible for removing it.
    fn create_staging_dir(&self, prefix: &str) -> ProgenResult<PathBuf>;
}

/// Outcome of probing a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable,
    NotFound,
}

/// Port for network access.
///
/// Implemented by `progen_adapters::http::HttpDownloader`.
#[cfg_attr(test, mockall::automock)]
pub trait Downloader: Send + Sync {
    /// Fetch `url` into `dest`. Transport errors and non-success HTTP
    /// statuses are both errors.
    fn download(&self, url: &str, dest: &Path) -> ProgenResult<()>;

    /// Check whether `url` exists. Only a 404 maps to `NotFound`; any other
    /// failure is an error.
    fn probe(&self, url: &str) -> ProgenResult<ProbeOutcome>;
}

/// Port for running external programs.
///
/// Implemented by `progen_adapters::process::ShellRunner`.
pub trait ProcessRunner: Send + Sync {
    /// Run `command` in `cwd`, handing each line of merged stdout/stderr to
    /// `on_line` as it arrives, and block until the process exits.
    ///
    /// Returns the exit code, or `None` when the process ended without one
    /// (killed by a signal). `Err` means it never started.
    fn run(
        &self,
        command: &CommandLine,
        cwd: &Path,
        on_line: &mut dyn FnMut(&str),
    ) -> ProgenResult<Option<i32>>;
}

/// Port for locating installed tools.
///
/// Implemented by `progen_adapters::locator::SystemToolLocator`.
#[cfg_attr(test, mockall::automock)]
pub trait ToolLocator: Send + Sync {
    /// Search the executable search path for `name`.
    fn which(&self, name: &str) -> Option<PathBuf>;

    /// The current user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Check that `path` is an existing regular file.
    fn is_file(&self, path: &Path) -> bool;
}

/// Port for user-facing output: streamed process lines and the final banner.
pub trait OutputSink: Send + Sync {
    /// One line of streamed output.
    fn line(&self, text: &str);

    /// A success message.
    fn success(&self, text: &str) {
        self.line(text);
    }
}
