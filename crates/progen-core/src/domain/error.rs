// ============================================================================
// domain/error.rs - PURE RULE VIOLATIONS
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// Domain errors are raised by pure decision functions (no I/O has happened
/// yet when one of these surfaces), so they are always safe to report and
/// retry after the user fixes the input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("{path} already contains reserved entries: {}", names.join(", "))]
    ReservedPathConflict { path: PathBuf, names: Vec<String> },

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Template manifest is empty")]
    EmptyManifest,

    #[error("Duplicate path in template manifest: {path}")]
    DuplicateManifestPath { path: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ReservedPathConflict { path, names } => vec![
                format!(
                    "'{}' looks like an existing project ({})",
                    path.display(),
                    names.join(", ")
                ),
                "Choose an empty or non-existent directory".into(),
                "Use --force to provision into it anyway".into(),
            ],
            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{}' is invalid: {}", name, reason),
                "Use letters, digits, hyphens, and underscores".into(),
                "Examples: myapp, my-service, data_tools".into(),
            ],
            Self::AbsolutePathNotAllowed { path } => vec![
                format!("'{}' must be relative to the project root", path),
                "Check the template names in your configuration".into(),
            ],
            Self::EmptyManifest | Self::DuplicateManifestPath { .. } => vec![
                "Check the [templates] section of your configuration".into(),
                "Run 'progen config list' to inspect the active values".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ReservedPathConflict { .. } => ErrorCategory::Conflict,
            Self::InvalidProjectName { .. } => ErrorCategory::Validation,
            Self::AbsolutePathNotAllowed { .. }
            | Self::EmptyManifest
            | Self::DuplicateManifestPath { .. } => ErrorCategory::Configuration,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    Configuration,
}
