//! Implementation of the `progen new` command.
//!
//! Responsibility: wire the real adapters into a `SessionController`, turn
//! the CLI arguments into a `SessionRequest`, and report the outcome. No
//! provisioning logic lives here.

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use progen_adapters::{HttpDownloader, LocalFilesystem, ShellRunner, SystemToolLocator};
use progen_core::prelude::*;

use crate::{
    cli::NewArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `progen new` command.
#[instrument(skip_all, fields(target = %args.name.display(), force = args.force))]
pub fn execute(args: NewArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if args.name.as_os_str().is_empty() {
        return Err(CliError::InvalidInput {
            message: "the project directory cannot be empty".into(),
            source: None,
        });
    }

    let cwd = std::env::current_dir().with_cli_context(|| "cannot read the current directory")?;
    let base = resolve_base(&cwd, args.path.as_deref());

    let controller = build_controller(&config, &output)?;
    let request = SessionRequest::new(args.name.clone(), base).force(args.force);

    output.header(&format!("Provisioning {}", args.name.display()))?;
    if args.force {
        output.warning("--force: existing project entries and project-creation errors are ignored")?;
    }

    let report = controller.run(&request)?;

    info!(
        session = %report.session_id,
        project = %report.project,
        toolchain = %report.toolchain.display(),
        templates = report.templates,
        steps = report.pipeline.executed,
        "Project provisioned"
    );

    Ok(())
}

fn build_controller(config: &AppConfig, output: &OutputManager) -> CliResult<SessionController> {
    let downloader = HttpDownloader::new(config.download_timeout())?;
    let runner = match config.command_timeout() {
        Some(limit) => ShellRunner::with_timeout(limit),
        None => ShellRunner::new(),
    };

    Ok(SessionController::new(
        Box::new(LocalFilesystem::new()),
        Box::new(downloader),
        Box::new(runner),
        Box::new(SystemToolLocator::new()),
        Box::new(output.sink()),
        config.session_settings(),
    ))
}

/// `--path` if given (relative to the working directory), else the working
/// directory itself.
fn resolve_base(cwd: &Path, path: Option<&Path>) -> PathBuf {
    match path {
        Some(p) => cwd.join(p),
        None => cwd.to_path_buf(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
