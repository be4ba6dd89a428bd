//! Where the new project goes, and which existing entries forbid it.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Absolute location of the project to provision.
///
/// Built with [`TargetPath::resolve`]; the final path component doubles as
/// the project name handed to the dependency manager and to the templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPath {
    path: PathBuf,
    name: String,
}

impl TargetPath {
    /// Resolve `input` against `base` and validate the resulting name.
    ///
    /// Absolute inputs are kept as-is; relative ones are joined onto `base`.
    /// The result is lexically normalised so `./myapp` and `a/../myapp`
    /// produce the same path as `myapp`.
    pub fn resolve(input: impl AsRef<Path>, base: impl AsRef<Path>) -> Result<Self, DomainError> {
        let input = input.as_ref();
        let joined = if input.is_absolute() {
            input.to_path_buf()
        } else {
            base.as_ref().join(input)
        };
        let path = normalize(&joined);

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .ok_or_else(|| DomainError::InvalidProjectName {
                name: input.display().to_string(),
                reason: "cannot extract a project name from this path".into(),
            })?;
        validate_project_name(&name)?;

        Ok(Self { path, name })
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory the dependency manager runs in to create the project.
    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or(&self.path)
    }

    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

fn validate_project_name(name: &str) -> Result<(), DomainError> {
    let reason = if name.is_empty() {
        Some("name cannot be empty")
    } else if name.starts_with('.') {
        Some("name cannot start with '.'")
    } else if name.chars().any(char::is_whitespace) {
        Some("name cannot contain whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(DomainError::InvalidProjectName {
            name: name.into(),
            reason: reason.into(),
        }),
        None => Ok(()),
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

/// Entry names whose presence marks a directory as an existing project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservedNames(BTreeSet<String>);

impl ReservedNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Every reserved name found among `entries`, sorted and de-duplicated.
    pub fn conflicts<'a, I>(&self, entries: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        entries
            .into_iter()
            .filter(|e| self.contains(e))
            .map(str::to_owned)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Default for ReservedNames {
    fn default() -> Self {
        Self::new([".venv", "requirements.txt", ".git"])
    }
}
