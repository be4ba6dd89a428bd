//! Places cached templates into the project tree.

use std::path::Path;

use tracing::{debug, instrument, trace};

use crate::{
    application::ports::Filesystem,
    domain::{AssetKind, CachedAsset, Substitutions},
    error::ProgenResult,
};

/// Copies cached assets into a project, substituting placeholders in text
/// files on the way.
///
/// Substitution rewrites the cached copy in place before it is copied, so
/// materializing the same cache twice substitutes into already-substituted
/// text.
pub struct TemplateMaterializer<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> TemplateMaterializer<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Returns the number of assets placed.
    #[instrument(skip_all, fields(assets = assets.len(), project = %project.display()))]
    pub fn materialize(
        &self,
        assets: &[CachedAsset],
        project: &Path,
        substitutions: &Substitutions,
    ) -> ProgenResult<usize> {
        for asset in assets {
            let dest = project.join(asset.entry.path.as_path());
            match asset.kind {
                AssetKind::File => self.place_file(&asset.local_path, &dest, substitutions)?,
                AssetKind::Directory => {
                    debug!(from = %asset.local_path.display(), to = %dest.display(), "Merging template directory");
                    self.filesystem.copy_dir_all(&asset.local_path, &dest)?;
                }
            }
        }
        Ok(assets.len())
    }

    fn place_file(
        &self,
        cached: &Path,
        dest: &Path,
        substitutions: &Substitutions,
    ) -> ProgenResult<()> {
        let bytes = self.filesystem.read_file(cached)?;
        match String::from_utf8(bytes) {
            Ok(text) => {
                let rendered = substitutions.apply(&text);
                if rendered != text {
                    trace!(path = %cached.display(), "Substituted placeholders");
                    self.filesystem.write_file(cached, rendered.as_bytes())?;
                }
            }
            Err(_) => debug!(path = %cached.display(), "Binary template; copying verbatim"),
        }

        if let Some(parent) = dest.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.copy_file(cached, dest)
    }
}
