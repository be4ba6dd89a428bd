//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `progen-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: file and directory operations, staging directories
//!   - `Downloader`: template and installer downloads, URL probes
//!   - `ProcessRunner`: external programs with streamed output
//!   - `ToolLocator`: executable search path and home directory
//!   - `OutputSink`: console lines and the success banner
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    Downloader, Filesystem, OutputSink, ProbeOutcome, ProcessRunner, ToolLocator,
};
