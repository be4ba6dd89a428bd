//! Infrastructure adapters for Progen.
//!
//! This crate implements the ports defined in `progen-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod http;
pub mod locator;
pub mod process;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use http::HttpDownloader;
pub use locator::SystemToolLocator;
pub use process::ShellRunner;
