//! Finds installed tools on the executable search path.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use progen_core::application::ports::ToolLocator;
use tracing::trace;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemToolLocator;

impl SystemToolLocator {
    pub fn new() -> Self {
        Self
    }
}

impl ToolLocator for SystemToolLocator {
    fn which(&self, name: &str) -> Option<PathBuf> {
        match which::which(name) {
            Ok(path) => Some(path),
            Err(e) => {
                trace!(name, error = %e, "Not on PATH");
                None
            }
        }
    }

    fn home_dir(&self) -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
