//! `progen config` reads configuration values.

use std::path::PathBuf;

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: &GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            output.print(&config.get(&key)?)?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            output.print(&config.to_toml()?)?;
        }

        ConfigCommands::Path => {
            output.print(&active_path(global).display().to_string())?;
        }
    }

    Ok(())
}

fn active_path(global: &GlobalArgs) -> PathBuf {
    global.config.clone().unwrap_or_else(AppConfig::config_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_config_flag_is_the_active_path() {
        let global = GlobalArgs {
            config: Some(PathBuf::from("/etc/progen.toml")),
            ..GlobalArgs::default()
        };
        assert_eq!(active_path(&global), PathBuf::from("/etc/progen.toml"));
    }

    #[test]
    fn default_active_path_is_platform_location() {
        assert_eq!(active_path(&GlobalArgs::default()), AppConfig::config_path());
    }
}
