//! External process runner built on `duct`.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use progen_core::{
    application::{ApplicationError, ports::ProcessRunner},
    domain::CommandLine,
    error::ProgenResult,
};
use tracing::{debug, instrument, trace, warn};

/// Status reported for a command killed by the timeout, matching coreutils
/// `timeout`.
pub const TIMEOUT_STATUS: i32 = 124;

/// Runs commands without a shell, merging stderr into stdout.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    timeout: Option<Duration>,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill any command still running after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

impl ProcessRunner for ShellRunner {
    #[instrument(skip_all, fields(command = %command, cwd = %cwd.display()))]
    fn run(
        &self,
        command: &CommandLine,
        cwd: &Path,
        on_line: &mut dyn FnMut(&str),
    ) -> ProgenResult<Option<i32>> {
        // `as_os_str` keeps bare names on PATH; duct rewrites `Path` programs
        // to `./name`.
        let mut expression = duct::cmd(command.program.as_os_str(), &command.args)
            .dir(cwd)
            .stderr_to_stdout()
            .unchecked();
        for (key, value) in &command.env {
            expression = expression.env(key, value);
        }

        let handle = Arc::new(expression.reader().map_err(|e| {
            ApplicationError::ProcessSpawnFailed {
                command: command.to_string(),
                reason: e.to_string(),
            }
        })?);

        // Lines are read on their own thread so the deadline holds even when
        // a leftover grandchild keeps the pipe open.
        let (tx, lines) = mpsc::channel::<String>();
        let source = Arc::clone(&handle);
        thread::spawn(move || {
            let mut reader = BufReader::new(&*source);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        let line = String::from_utf8_lossy(&buf);
                        if tx.send(line.trim_end_matches(['\n', '\r']).to_owned()).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        debug!(error = %e, "Output stream closed");
                        break;
                    }
                }
            }
        });

        let deadline = self.timeout.map(|limit| Instant::now() + limit);
        loop {
            let next = match deadline {
                Some(at) => lines.recv_timeout(at.saturating_duration_since(Instant::now())),
                None => lines.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match next {
                Ok(line) => on_line(&line),
                Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {
                    if let Ok(Some(_)) = handle.try_wait() {
                        trace!("Process exited; output pipe still held by a child");
                        break;
                    }
                    warn!(timeout = ?self.timeout, "Command timed out");
                    if let Err(e) = handle.kill() {
                        warn!(error = %e, "Cannot kill timed-out command");
                    }
                    return Ok(Some(TIMEOUT_STATUS));
                }
            }
        }

        let status = match handle.try_wait() {
            Ok(Some(output)) => output.status.code(),
            Ok(None) => None,
            Err(e) => {
                debug!(error = %e, "Cannot read exit status");
                None
            }
        };
        debug!(?status, "Command finished");
        Ok(status)
    }
}
