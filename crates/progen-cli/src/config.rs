//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate only sees the [`SessionSettings`]
//! derived from it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. `PROGEN_`-prefixed environment variables, `__` between sections
//!    (`PROGEN_NETWORK__TIMEOUT_SECS=60`)
//! 2. Config file (`--config FILE`, else the platform config directory)
//! 3. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use progen_core::domain::{ManifestSource, ProjectSettings, SessionSettings, ToolchainSettings};

use crate::error::{CliError, CliResult};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Download timeout.
    pub network: NetworkConfig,
    /// Per-command timeout for pipeline steps.
    pub commands: CommandsConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Where templates come from and which ones the project receives.
    pub templates: ManifestSource,
    pub project: ProjectSettings,
    pub toolchain: ToolchainSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// `0` lets commands run as long as they need.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

impl AppConfig {
    /// Load configuration from the file and the environment over defaults.
    ///
    /// An explicit `--config` file must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required, Environment::with_prefix("PROGEN"))
    }

    fn load_from(path: &Path, required: bool, env: Environment) -> CliResult<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(env.prefix_separator("_").separator("__"))
            .build()
            .map_err(|e| {
                CliError::config(format!("cannot load '{}'", path.display()), e)
            })?;

        settings
            .try_deserialize()
            .map_err(|e| CliError::config("invalid configuration", e))
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.progen.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "progen", "progen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".progen.toml"))
    }

    /// The immutable settings handed to the session controller.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            templates: self.templates.clone(),
            project: self.project.clone(),
            toolchain: self.toolchain.clone(),
        }
    }

    pub fn download_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.network.timeout_secs)
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.commands.timeout_secs)
    }

    /// Look up a dotted key such as `network.timeout_secs`.
    ///
    /// Scalars are returned bare; arrays and tables as JSON.
    pub fn get(&self, key: &str) -> CliResult<String> {
        let root = serde_json::to_value(self)
            .map_err(|e| CliError::config("cannot serialise configuration", e))?;

        let value = key
            .split('.')
            .try_fold(&root, |node, part| match node {
                serde_json::Value::Object(map) => map.get(part),
                serde_json::Value::Array(items) => {
                    part.parse::<usize>().ok().and_then(|i| items.get(i))
                }
                _ => None,
            })
            .ok_or_else(|| CliError::UnknownConfigKey { key: key.into() })?;

        Ok(match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::config("cannot serialise configuration", e))
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
