//! Application layer for Progen.
//!
//! This layer contains:
//! - **Services**: the orchestration components (path validation, asset
//!   fetching, toolchain bootstrap, pipeline, materialization, session)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer and owns every side
//! effect ordering decision, but performs no I/O itself.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    AssetFetcher, BootstrapState, PathValidator, PipelineReport, PipelineRunner, SessionController,
    SessionReport, SessionRequest, Step, StepAction, TemplateMaterializer, ToolchainBootstrapper,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Downloader, Filesystem, OutputSink, ProbeOutcome, ProcessRunner, ToolLocator};

pub use error::ApplicationError;
