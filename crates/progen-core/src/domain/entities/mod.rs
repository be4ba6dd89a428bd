pub mod command;
pub mod common;
pub mod manifest;
pub mod substitution;
pub mod target_path;

pub use crate::domain::DomainError;
pub use command::CommandLine;
pub use manifest::{CachedAsset, TemplateManifest, TemplateManifestEntry};
pub use target_path::{ReservedNames, TargetPath};
