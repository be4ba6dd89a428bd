//! Makes sure the dependency manager can be run, installing it if needed.
//!
//! The installer is treated as an opaque program: it is downloaded, handed
//! a base URL through its environment, and judged only by its exit code.

use std::cell::Cell;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Downloader, Filesystem, OutputSink, ProbeOutcome, ProcessRunner, ToolLocator},
    },
    domain::{CommandLine, ToolchainSettings},
    error::{ProgenError, ProgenResult},
};

/// Progress of one bootstrap attempt.
///
/// `Installed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    NotInstalled,
    InstallerFetched,
    BaseUrlResolved,
    Installed,
    Failed,
}

impl BootstrapState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Installed | Self::Failed)
    }
}

impl fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotInstalled => "not-installed",
            Self::InstallerFetched => "installer-fetched",
            Self::BaseUrlResolved => "base-url-resolved",
            Self::Installed => "installed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

pub struct ToolchainBootstrapper<'a> {
    filesystem: &'a dyn Filesystem,
    downloader: &'a dyn Downloader,
    runner: &'a dyn ProcessRunner,
    locator: &'a dyn ToolLocator,
    sink: &'a dyn OutputSink,
    settings: &'a ToolchainSettings,
    state: Cell<BootstrapState>,
}

impl<'a> ToolchainBootstrapper<'a> {
    pub fn new(
        filesystem: &'a dyn Filesystem,
        downloader: &'a dyn Downloader,
        runner: &'a dyn ProcessRunner,
        locator: &'a dyn ToolLocator,
        sink: &'a dyn OutputSink,
        settings: &'a ToolchainSettings,
    ) -> Self {
        Self {
            filesystem,
            downloader,
            runner,
            locator,
            sink,
            settings,
            state: Cell::new(BootstrapState::NotInstalled),
        }
    }

    pub fn state(&self) -> BootstrapState {
        self.state.get()
    }

    /// Return the path of a runnable binary, installing it first if it is
    /// neither on the search path nor at the home fallback.
    ///
    /// `scratch` receives the downloaded installer. No version check is made
    /// on a binary that is already present.
    #[instrument(skip_all, fields(binary = %self.settings.binary))]
    pub fn ensure(&self, scratch: &Path) -> ProgenResult<PathBuf> {
        if let Some(found) = self.locate() {
            info!(path = %found.display(), "Toolchain found");
            self.advance(BootstrapState::Installed);
            return Ok(found);
        }

        info!("Toolchain not found; installing");
        match self.install(scratch) {
            Ok(path) => {
                self.advance(BootstrapState::Installed);
                Ok(path)
            }
            Err(e) => {
                self.advance(BootstrapState::Failed);
                Err(match e {
                    ProgenError::Application(ApplicationError::ToolchainBootstrapFailure {
                        ..
                    }) => e,
                    other => ApplicationError::ToolchainBootstrapFailure {
                        reason: other.to_string(),
                    }
                    .into(),
                })
            }
        }
    }

    fn locate(&self) -> Option<PathBuf> {
        if let Some(path) = self.locator.which(&self.settings.binary) {
            return Some(path);
        }
        let fallback = self.home_fallback()?;
        self.locator.is_file(&fallback).then_some(fallback)
    }

    fn home_fallback(&self) -> Option<PathBuf> {
        self.locator
            .home_dir()
            .map(|home| home.join(&self.settings.home_fallback))
    }

    fn install(&self, scratch: &Path) -> ProgenResult<PathBuf> {
        let installer = self.fetch_installer(scratch)?;
        self.advance(BootstrapState::InstallerFetched);

        let base_url = self.resolve_base_url()?;
        self.advance(BootstrapState::BaseUrlResolved);

        let command = CommandLine::new(&self.settings.interpreter)
            .arg(installer.display().to_string())
            .args(self.settings.installer_args.iter().cloned())
            .env(&self.settings.base_url_env, base_url);

        debug!(command = %command, "Running installer");
        let status = self
            .runner
            .run(&command, scratch, &mut |line| self.sink.line(line))?;

        if status != Some(0) {
            return Err(ApplicationError::ToolchainBootstrapFailure {
                reason: match status {
                    Some(code) => format!("installer exited with status {code}"),
                    None => "installer terminated without an exit status".into(),
                },
            }
            .into());
        }

        self.locate().or_else(|| self.home_fallback()).ok_or_else(|| {
            ApplicationError::ToolchainBootstrapFailure {
                reason: format!(
                    "'{}' is still missing and no home directory is known",
                    self.settings.binary
                ),
            }
            .into()
        })
    }

    fn fetch_installer(&self, scratch: &Path) -> ProgenResult<PathBuf> {
        let file_name = self
            .settings
            .installer_url
            .rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or("installer");
        let dir = scratch.join("installer");
        self.filesystem.create_dir_all(&dir)?;
        let path = dir.join(file_name);
        self.downloader.download(&self.settings.installer_url, &path)?;
        Ok(path)
    }

    fn resolve_base_url(&self) -> ProgenResult<&'a str> {
        let url = match self.downloader.probe(&self.settings.repository_url)? {
            ProbeOutcome::Reachable => self.settings.base_url.as_str(),
            ProbeOutcome::NotFound => {
                warn!(
                    probed = %self.settings.repository_url,
                    fallback = %self.settings.fallback_base_url,
                    "Repository not found; using fallback base URL"
                );
                self.settings.fallback_base_url.as_str()
            }
        };
        Ok(url)
    }

    fn advance(&self, next: BootstrapState) {
        let current = self.state.replace(next);
        debug!(from = %current, to = %next, "Bootstrap state");
    }
}
