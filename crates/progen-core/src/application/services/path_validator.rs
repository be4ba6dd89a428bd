//! Decides whether a target directory may receive a new project.

use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::{
    application::ports::Filesystem,
    domain::{DomainError, ReservedNames, TargetPath},
    error::ProgenResult,
};

/// Rejects targets that already look like a project.
///
/// Reads one directory listing and nothing else; no files are created.
pub struct PathValidator<'a> {
    filesystem: &'a dyn Filesystem,
    reserved: &'a ReservedNames,
}

impl<'a> PathValidator<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, reserved: &'a ReservedNames) -> Self {
        Self {
            filesystem,
            reserved,
        }
    }

    /// Resolve `input` against `base` and check it for reserved entries.
    ///
    /// Non-existent and empty targets always pass. A directory holding any
    /// reserved entry fails with `ReservedPathConflict` unless `force` is set.
    #[instrument(skip_all, fields(input = %input.as_ref().display(), force = force))]
    pub fn validate(
        &self,
        input: impl AsRef<Path>,
        base: impl AsRef<Path>,
        force: bool,
    ) -> ProgenResult<TargetPath> {
        let target = TargetPath::resolve(input, base)?;

        if !self.filesystem.is_dir(target.as_path()) {
            debug!(path = %target, "Target does not exist yet");
            return Ok(target);
        }

        let entries = self.filesystem.list_dir(target.as_path())?;
        let conflicts = self.reserved.conflicts(entries.iter().map(String::as_str));

        if conflicts.is_empty() {
            debug!(path = %target, entries = entries.len(), "Target has no reserved entries");
            return Ok(target);
        }

        if force {
            warn!(
                path = %target,
                conflicts = %conflicts.join(", "),
                "Reserved entries present; continuing because of --force"
            );
            return Ok(target);
        }

        Err(DomainError::ReservedPathConflict {
            path: target.as_path().to_path_buf(),
            names: conflicts,
        }
        .into())
    }
}
