//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "progen",
    bin_name = "progen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Provision a ready-to-code Python project",
    long_about = "Progen creates a Poetry project, installs the standard \
                  development toolchain, drops in the team's template files, \
                  and initialises git with pre-commit hooks.",
    after_help = "EXAMPLES:\n\
        \x20 progen new myapp\n\
        \x20 progen new myapp --path ~/src\n\
        \x20 progen new . --force\n\
        \x20 progen templates --format json",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Provision a new project.
    #[command(
        visible_alias = "n",
        about = "Provision a new project",
        after_help = "EXAMPLES:\n\
            \x20 progen new myapp               # ./myapp\n\
            \x20 progen new ../myapp            # one level up\n\
            \x20 progen new myapp --path /srv   # /srv/myapp\n\
            \x20 progen new . --force           # current directory, even if it has a .venv"
    )]
    New(NewArgs),

    /// Show the template manifest.
    #[command(
        visible_alias = "ls",
        about = "List the templates a new project receives",
        after_help = "EXAMPLES:\n\
            \x20 progen templates\n\
            \x20 progen templates --format json"
    )]
    Templates(TemplatesArgs),

    /// Write a default configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 progen init\n\
            \x20 progen init --force\n\
            \x20 progen --config ./progen.toml init"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 progen completions bash > ~/.local/share/bash-completion/completions/progen\n\
            \x20 progen completions zsh  > ~/.zfunc/_progen\n\
            \x20 progen completions fish > ~/.config/fish/completions/progen.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Progen configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 progen config get toolchain.binary\n\
            \x20 progen config list\n\
            \x20 progen config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `progen new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Target directory. A relative path is resolved against `--path`, or
    /// the current directory.
    #[arg(value_name = "NAME", help = "Project directory name or path")]
    pub name: PathBuf,

    /// Base directory for a relative NAME.
    #[arg(
        short = 'p',
        long = "path",
        value_name = "DIR",
        help = "Base directory (default: current directory)"
    )]
    pub path: Option<PathBuf>,

    /// Provision into a directory that already holds a project.
    #[arg(
        long = "force",
        help = "Ignore existing .git/.venv/requirements.txt and project-creation errors"
    )]
    pub force: bool,
}

// ── templates ────────────────────────────────────────────────────────────────

/// Arguments for `progen templates`.
#[derive(Debug, Args)]
pub struct TemplatesArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `templates` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One project path per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `progen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `progen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `progen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `toolchain.binary`.
        key: String,
    },
    /// Print the effective configuration as TOML.
    List,
    /// Print the path to the configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
