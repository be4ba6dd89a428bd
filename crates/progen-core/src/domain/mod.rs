// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Progen.
//!
//! Pure decisions and plain data: where the project goes, which templates it
//! gets, how placeholders are substituted, and what the run is configured
//! with. Nothing in here touches the filesystem, the network, or a process.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: directory listings are passed in, never read
//! - **No async**: everything is synchronous and sequential
//! - **Only std + thiserror + serde**
//! - **Immutable values**: entities are `Clone + PartialEq`
pub mod entities;
pub mod error;
pub mod settings;

pub use entities::{
    command::CommandLine,
    common::RelativePath,
    manifest::{
        AssetKind, CachedAsset, ManifestSource, TemplateManifest, TemplateManifestEntry,
        TemplateSpec, join_url,
    },
    substitution::Substitutions,
    target_path::{ReservedNames, TargetPath},
};

pub use error::{DomainError, ErrorCategory};

pub use settings::{ProjectSettings, SessionSettings, ToolchainSettings};
