//! Immutable per-run settings for a provisioning session.
//!
//! These are the values the session controller is configured with: where
//! templates come from, which entries mark an existing project, how the
//! dependency manager is found or installed, and the literal text of the
//! generated files. They are loaded once (by the CLI, from its layered
//! configuration) and never mutated during a run.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{manifest::ManifestSource, target_path::ReservedNames};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub templates: ManifestSource,
    pub project: ProjectSettings,
    pub toolchain: ToolchainSettings,
}

/// What the generated project looks like beyond the downloaded templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    pub reserved_names: ReservedNames,
    /// Literal token replaced with the project name inside text templates.
    pub placeholder: String,
    pub dev_dependencies: Vec<String>,
    /// Whitespace-delimited ignore entries; written one per line.
    pub ignore_entries: String,
    pub ignore_file: String,
    pub mirror_manifest: String,
    pub mirror_manifest_file: String,
    pub vcs_program: String,
    /// Hook installer, relative to the project root.
    pub hook_installer: String,
}

impl ProjectSettings {
    /// The ignore file body: one entry per line, trailing newline.
    pub fn ignore_file_contents(&self) -> String {
        let mut out = self
            .ignore_entries
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            reserved_names: ReservedNames::default(),
            placeholder: "{project_name}".into(),
            dev_dependencies: [
                "black",
                "isort",
                "flake8",
                "flake8-docstrings",
                "flake8-annotations",
                "flake8-bugbear",
                "flake8-import-order",
                "flake8-builtins",
                "pep8-naming",
                "python-dotenv",
                "coverage",
                "pre-commit",
                "mypy",
                "pre-commit-hooks",
                "pytest-mock",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            ignore_entries: "/.vscode /.idea /.env /.venv /dist .DS_Store .pyc \
                             *.ipynb* *.sqlite3 __pycache__ /tmp .pytest_cache .mypy_cache \
                             .python-version"
                .into(),
            ignore_file: ".gitignore".into(),
            mirror_manifest: DEFAULT_MIRROR_MANIFEST.into(),
            mirror_manifest_file: "peru.yaml".into(),
            vcs_program: "git".into(),
            hook_installer: ".venv/bin/pre-commit".into(),
        }
    }
}

const DEFAULT_MIRROR_MANIFEST: &str = "
imports:
  k8s-deploy: k8s-deploy/

git module k8s-deploy:
  url: https://gitlab.com/wartek-id/infra/k8s-deploy.git
  rev: master

";

/// How the dependency manager is located and, if missing, installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    pub binary: String,
    /// Fallback install location, relative to the user's home directory.
    pub home_fallback: String,
    pub installer_url: String,
    pub interpreter: String,
    pub installer_args: Vec<String>,
    /// Probed before installing; a 404 switches to `fallback_base_url`.
    pub repository_url: String,
    pub base_url: String,
    pub fallback_base_url: String,
    /// Environment variable through which the installer receives the base URL.
    pub base_url_env: String,
}

impl Default for ToolchainSettings {
    fn default() -> Self {
        Self {
            binary: "poetry".into(),
            home_fallback: ".poetry/bin/poetry".into(),
            installer_url:
                "https://raw.githubusercontent.com/python-poetry/poetry/master/get-poetry.py".into(),
            interpreter: "python3".into(),
            installer_args: vec!["--yes".into()],
            repository_url: "https://github.com/python-poetry/poetry".into(),
            base_url: "https://github.com/python-poetry/poetry/releases/download/".into(),
            fallback_base_url: "https://github.com/sdispater/poetry/releases/download/".into(),
            base_url_env: "POETRY_BASE_URL".into(),
        }
    }
}
