//! The fixed, ordered set of template assets a project receives.
//!
//! A manifest is described in configuration as a base URL plus a list of
//! [`TemplateSpec`]s, and compiled once per run into a [`TemplateManifest`]
//! of fully-resolved [`TemplateManifestEntry`] values.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::{entities::common::RelativePath, error::DomainError};

/// One configured template: a logical name and where it lives in the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub name: String,
    pub path: String,
    /// Absolute URL override; otherwise `base_url/path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TemplateSpec {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            url: None,
        }
    }
}

/// Where templates come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestSource {
    pub base_url: String,
    pub entries: Vec<TemplateSpec>,
}

impl Default for ManifestSource {
    fn default() -> Self {
        Self {
            base_url: "https://raw.githubusercontent.com/herlambang/progen/main/templates".into(),
            entries: vec![
                TemplateSpec::new("coverage", ".coveragerc"),
                TemplateSpec::new("env", ".env"),
                TemplateSpec::new("flake8", ".flake8"),
                TemplateSpec::new("gitlab-ci", ".gitlab-ci.yaml"),
                TemplateSpec::new("isort", ".isort.cfg"),
                TemplateSpec::new("pre-commit", ".pre-commit-config.yaml"),
                TemplateSpec::new("vscode-settings", ".vscode/settings.json"),
                TemplateSpec::new("dockerfile", "Dockerfile"),
            ],
        }
    }
}

/// A (logical name, relative path, source URL) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateManifestEntry {
    pub name: String,
    pub path: RelativePath,
    pub url: String,
}

/// Ordered, validated list of manifest entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateManifest {
    entries: Vec<TemplateManifestEntry>,
}

impl TemplateManifest {
    /// Compile a [`ManifestSource`], resolving each entry's URL.
    ///
    /// Fails on an empty list, an escaping path, or two entries that would
    /// land on the same project path.
    pub fn from_source(source: &ManifestSource) -> Result<Self, DomainError> {
        if source.entries.is_empty() {
            return Err(DomainError::EmptyManifest);
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(source.entries.len());
        for spec in &source.entries {
            let path = RelativePath::try_new(&spec.path)?;
            if !seen.insert(path.clone()) {
                return Err(DomainError::DuplicateManifestPath {
                    path: spec.path.clone(),
                });
            }
            let url = spec
                .url
                .clone()
                .unwrap_or_else(|| join_url(&source.base_url, &path.to_slash_string()));
            entries.push(TemplateManifestEntry {
                name: spec.name.clone(),
                path,
                url,
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[TemplateManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Join a base URL and a relative path with exactly one `/` between them.
pub fn join_url(base: &str, relative: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        relative.trim_start_matches('/')
    )
}

/// What a cached asset turned out to be on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    File,
    Directory,
}

/// A manifest entry resolved to a local copy inside the staging area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAsset {
    pub entry: TemplateManifestEntry,
    pub local_path: PathBuf,
    pub kind: AssetKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_manifest_compiles_in_order() {
        let manifest = TemplateManifest::from_source(&ManifestSource::default()).unwrap();
        assert_eq!(manifest.len(), 8);
        assert_eq!(manifest.entries()[0].path.to_slash_string(), ".coveragerc");
        assert_eq!(
            manifest.entries()[6].url,
            "https://raw.githubusercontent.com/herlambang/progen/main/templates/.vscode/settings.json"
        );
    }

    #[test]
    fn url_join_tolerates_trailing_slash() {
        assert_eq!(join_url("https://h/t/", ".env"), "https://h/t/.env");
        assert_eq!(join_url("https://h/t", ".env"), "https://h/t/.env");
    }

    #[test]
    fn explicit_url_wins() {
        let source = ManifestSource {
            base_url: "https://h".into(),
            entries: vec![TemplateSpec {
                name: "docker".into(),
                path: "Dockerfile".into(),
                url: Some("https://mirror/Dockerfile".into()),
            }],
        };
        let manifest = TemplateManifest::from_source(&source).unwrap();
        assert_eq!(manifest.entries()[0].url, "https://mirror/Dockerfile");
    }

    #[test]
    fn empty_and_duplicate_manifests_are_rejected() {
        let empty = ManifestSource {
            base_url: "https://h".into(),
            entries: vec![],
        };
        assert_eq!(
            TemplateManifest::from_source(&empty),
            Err(DomainError::EmptyManifest)
        );

        let dup = ManifestSource {
            base_url: "https://h".into(),
            entries: vec![TemplateSpec::new("a", ".env"), TemplateSpec::new("b", "./.env")],
        };
        assert!(matches!(
            TemplateManifest::from_source(&dup),
            Err(DomainError::DuplicateManifestPath { .. })
        ));
    }
}
