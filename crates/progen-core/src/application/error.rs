//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O, not rule
//! violations. Rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while provisioning.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Fewer templates were cached than the manifest lists.
    #[error("Incomplete templates downloaded: {fetched} of {expected}")]
    IncompleteAssets {
        fetched: usize,
        expected: usize,
        missing: Vec<String>,
    },

    /// The dependency manager is missing and could not be installed.
    #[error("Unable to install the toolchain: {reason}")]
    ToolchainBootstrapFailure { reason: String },

    /// A pipeline step returned a non-zero status.
    #[error("Step '{step}' failed with status {status}")]
    PipelineStepFailure { step: String, status: i32 },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A download could not be completed.
    #[error("Cannot download {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// An external program could not be started.
    #[error("Cannot run '{command}': {reason}")]
    ProcessSpawnFailed { command: String, reason: String },

    /// In-memory adapter state was poisoned by a panicking thread.
    #[error("Adapter state lock poisoned")]
    LockPoisoned,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::IncompleteAssets { missing, .. } => vec![
                format!("Missing templates: {}", missing.join(", ")),
                "Check your network connection and try again".into(),
                "Verify templates.base_url with 'progen config get templates.base_url'".into(),
            ],
            Self::ToolchainBootstrapFailure { .. } => vec![
                "Install poetry manually: https://python-poetry.org/docs/#installation".into(),
                "Make sure 'poetry' is on your PATH, then re-run".into(),
            ],
            Self::PipelineStepFailure { step, .. } => vec![
                format!("Check the output of '{}' above", step),
                "Files created by earlier steps were left in place".into(),
                "Remove the partially created project before retrying".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::DownloadFailed { url, .. } => vec![
                format!("Could not fetch {}", url),
                "Check your network connection".into(),
            ],
            Self::ProcessSpawnFailed { command, .. } => vec![
                format!("'{}' could not be started", command),
                "Ensure the program is installed and on your PATH".into(),
            ],
            Self::LockPoisoned => vec!["Try again".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IncompleteAssets { .. } | Self::DownloadFailed { .. } => ErrorCategory::Network,
            Self::ToolchainBootstrapFailure { .. } => ErrorCategory::Toolchain,
            Self::PipelineStepFailure { .. } | Self::ProcessSpawnFailed { .. } => {
                ErrorCategory::Execution
            }
            Self::FilesystemError { .. } | Self::LockPoisoned => ErrorCategory::Internal,
        }
    }
}
