//! Progen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Progen
//! project provisioner, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           progen-cli (CLI)              │
//! │   (config, logging, terminal output)    │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (SessionController and components)     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, Downloader, ProcessRunner, │
//! │        ToolLocator, OutputSink)         │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    progen-adapters (Infrastructure)     │
//! │ (LocalFilesystem, HttpDownloader, ...)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use progen_core::prelude::*;
//!
//! # fn adapters() -> (Box<dyn Filesystem>, Box<dyn Downloader>, Box<dyn ProcessRunner>, Box<dyn ToolLocator>, Box<dyn OutputSink>) { unimplemented!() }
//! let (fs, downloader, runner, locator, sink) = adapters();
//! let session = SessionController::new(fs, downloader, runner, locator, sink, SessionSettings::default());
//!
//! let report = session.run(&SessionRequest::new("myapp", "/work"))?;
//! println!("{}", report.project);
//! # Ok::<(), ProgenError>(())
//! ```

pub mod application;
pub mod domain;
pub mod error;

pub mod prelude {
    pub use crate::application::{
        SessionController, SessionReport, SessionRequest,
        ports::{Downloader, Filesystem, OutputSink, ProbeOutcome, ProcessRunner, ToolLocator},
    };
    pub use crate::domain::{
        CommandLine, ManifestSource, ProjectSettings, SessionSettings, TargetPath,
        TemplateManifest, ToolchainSettings,
    };
    pub use crate::error::{ProgenError, ProgenResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
