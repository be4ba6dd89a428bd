//! Resolves the template manifest to local cached copies.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Downloader, Filesystem},
    },
    domain::{AssetKind, CachedAsset, TemplateManifest, TemplateManifestEntry},
    error::ProgenResult,
};

/// Downloads manifest entries into a cache directory, skipping any entry
/// already present.
///
/// A failed download never fails the whole fetch: the entry is logged and
/// left out of the result, and the caller decides what a short result means
/// (see [`AssetFetcher::require_complete`]).
pub struct AssetFetcher<'a> {
    filesystem: &'a dyn Filesystem,
    downloader: &'a dyn Downloader,
}

impl<'a> AssetFetcher<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, downloader: &'a dyn Downloader) -> Self {
        Self {
            filesystem,
            downloader,
        }
    }

    /// Fetch every manifest entry into `destination`, in manifest order.
    ///
    /// Presence on disk is a cache hit regardless of content or age; no
    /// network call is made for it.
    #[instrument(skip_all, fields(entries = manifest.len(), destination = %destination.display()))]
    pub fn fetch(&self, manifest: &TemplateManifest, destination: &Path) -> Vec<CachedAsset> {
        let mut cached = Vec::with_capacity(manifest.len());

        for entry in manifest.entries() {
            let local = destination.join(entry.path.as_path());

            if self.filesystem.exists(&local) {
                debug!(template = %entry.name, path = %local.display(), "Template already cached");
                cached.push(self.cached(entry, &local));
                continue;
            }

            match self.download(entry, &local) {
                Ok(()) => {
                    info!(url = %entry.url, path = %local.display(), "Template downloaded");
                    cached.push(self.cached(entry, &local));
                }
                Err(e) => {
                    warn!(url = %entry.url, error = %e, "Cannot download template");
                }
            }
        }

        cached
    }

    /// Turn a short fetch result into `IncompleteAssets`.
    pub fn require_complete(
        manifest: &TemplateManifest,
        cached: &[CachedAsset],
    ) -> ProgenResult<()> {
        if cached.len() >= manifest.len() {
            return Ok(());
        }

        let missing = manifest
            .entries()
            .iter()
            .filter(|e| !cached.iter().any(|c| c.entry.path == e.path))
            .map(|e| e.path.to_string())
            .collect();

        Err(ApplicationError::IncompleteAssets {
            fetched: cached.len(),
            expected: manifest.len(),
            missing,
        }
        .into())
    }

    fn download(&self, entry: &TemplateManifestEntry, local: &Path) -> ProgenResult<()> {
        if let Some(parent) = local.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.downloader.download(&entry.url, local)
    }

    fn cached(&self, entry: &TemplateManifestEntry, local: &Path) -> CachedAsset {
        let kind = if self.filesystem.is_dir(local) {
            AssetKind::Directory
        } else {
            AssetKind::File
        };
        CachedAsset {
            entry: entry.clone(),
            local_path: local.to_path_buf(),
            kind,
        }
    }
}
