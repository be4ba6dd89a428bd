//! Strictly ordered, fail-fast execution of provisioning steps.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, error, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{OutputSink, ProcessRunner},
    },
    domain::CommandLine,
    error::ProgenResult,
};

/// Status reported when a command cannot be started at all.
pub const SPAWN_FAILURE_STATUS: i32 = 127;

/// Status reported when an in-process step returns an error.
pub const CALLABLE_FAILURE_STATUS: i32 = 1;

type Callable<'a> = Box<dyn FnOnce() -> ProgenResult<()> + 'a>;

/// What a step does.
pub enum StepAction<'a> {
    /// An external program run in `cwd`.
    Command {
        command: CommandLine,
        cwd: PathBuf,
        /// Treat a non-zero exit as success.
        ignore_error: bool,
    },
    /// In-process work; an `Err` becomes a non-zero status.
    Callable(Callable<'a>),
}

impl fmt::Debug for StepAction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command {
                command,
                cwd,
                ignore_error,
            } => f
                .debug_struct("Command")
                .field("command", &command.to_string())
                .field("cwd", cwd)
                .field("ignore_error", ignore_error)
                .finish(),
            Self::Callable(_) => f.write_str("Callable"),
        }
    }
}

/// One labelled unit of pipeline work.
#[derive(Debug)]
pub struct Step<'a> {
    pub label: String,
    pub action: StepAction<'a>,
}

impl<'a> Step<'a> {
    pub fn command(command: CommandLine, cwd: impl Into<PathBuf>) -> Self {
        Self {
            label: command.to_string(),
            action: StepAction::Command {
                command,
                cwd: cwd.into(),
                ignore_error: false,
            },
        }
    }

    pub fn callable(
        label: impl Into<String>,
        f: impl FnOnce() -> ProgenResult<()> + 'a,
    ) -> Self {
        Self {
            label: label.into(),
            action: StepAction::Callable(Box::new(f)),
        }
    }

    /// Mark a command step so its exit code never stops the pipeline.
    /// No effect on callables.
    pub fn ignore_error(mut self, ignore: bool) -> Self {
        if let StepAction::Command { ignore_error, .. } = &mut self.action {
            *ignore_error = ignore;
        }
        self
    }
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Final status; 0 means every executed step succeeded.
    pub status: i32,
    /// Steps actually started, including the failing one.
    pub executed: usize,
    pub total: usize,
    pub failed_step: Option<String>,
}

impl PipelineReport {
    pub fn is_success(&self) -> bool {
        self.status == 0
    }

    /// Convert a failed run into `PipelineStepFailure`.
    pub fn into_result(self) -> ProgenResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(ApplicationError::PipelineStepFailure {
            step: self.failed_step.unwrap_or_default(),
            status: self.status,
        }
        .into())
    }
}

pub struct PipelineRunner<'a> {
    runner: &'a dyn ProcessRunner,
    sink: &'a dyn OutputSink,
}

impl<'a> PipelineRunner<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, sink: &'a dyn OutputSink) -> Self {
        Self { runner, sink }
    }

    /// Execute `steps` in order, stopping at the first non-zero status.
    ///
    /// Never returns an error: spawn failures and callable errors are logged
    /// and folded into the status. A command that ends without an exit code
    /// counts as success; a callable that fails never does.
    #[instrument(skip_all, fields(steps = steps.len()))]
    pub fn run(&self, steps: Vec<Step<'_>>) -> PipelineReport {
        let total = steps.len();
        let mut report = PipelineReport {
            status: 0,
            executed: 0,
            total,
            failed_step: None,
        };

        for (index, step) in steps.into_iter().enumerate() {
            info!(step = index + 1, total, label = %step.label, "Running step");
            report.executed += 1;

            let status = self.execute(step.action, &step.label).unwrap_or(0);
            if status != 0 {
                error!(label = %step.label, status, "Step failed; stopping");
                report.status = status;
                report.failed_step = Some(step.label);
                break;
            }
        }

        debug!(status = report.status, executed = report.executed, "Pipeline finished");
        report
    }

    fn execute(&self, action: StepAction<'_>, label: &str) -> Option<i32> {
        match action {
            StepAction::Command {
                command,
                cwd,
                ignore_error,
            } => {
                let result = self
                    .runner
                    .run(&command, &cwd, &mut |line| self.sink.line(line));
                match result {
                    Ok(Some(code)) if code != 0 && ignore_error => {
                        warn!(label, code, "Ignoring non-zero exit");
                        Some(0)
                    }
                    Ok(status) => {
                        if status.is_none() {
                            debug!(label, "Command ended without an exit code");
                        }
                        status
                    }
                    Err(e) => {
                        error!(label, error = %e, "Cannot start command");
                        Some(SPAWN_FAILURE_STATUS)
                    }
                }
            }
            StepAction::Callable(f) => match f() {
                Ok(()) => Some(0),
                Err(e) => {
                    error!(label, error = %e, "Step raised an error");
                    Some(CALLABLE_FAILURE_STATUS)
                }
            },
        }
    }
}
