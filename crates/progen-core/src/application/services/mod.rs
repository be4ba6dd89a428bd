//! Application services - orchestrate use cases.
//!
//! Each component borrows the ports it needs; `SessionController` owns them
//! and wires the components together for one provisioning run.

pub mod asset_fetcher;
pub mod materializer;
pub mod path_validator;
pub mod pipeline;
pub mod session;
pub mod toolchain;

#[cfg(test)]
pub(crate) mod test_support;

pub use asset_fetcher::AssetFetcher;
pub use materializer::TemplateMaterializer;
pub use path_validator::PathValidator;
pub use pipeline::{PipelineReport, PipelineRunner, Step, StepAction};
pub use session::{SessionController, SessionReport, SessionRequest};
pub use toolchain::{BootstrapState, ToolchainBootstrapper};
