//! Implementation of the `progen templates` command.

use progen_core::{
    domain::{TemplateManifest, TemplateManifestEntry},
    error::ProgenError,
};
use serde_json::json;

use crate::{
    cli::{ListFormat, TemplatesArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(args: TemplatesArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let manifest = TemplateManifest::from_source(&config.templates).map_err(ProgenError::from)?;

    match args.format {
        ListFormat::Table => {
            output.header(&format!("Templates ({}):", manifest.len()))?;
            let width = manifest
                .entries()
                .iter()
                .map(|e| e.path.to_string().len())
                .max()
                .unwrap_or(0);
            for entry in manifest.entries() {
                output.print(&format!(
                    "  {:<width$}  {}",
                    entry.path.to_string(),
                    entry.url
                ))?;
            }
        }

        ListFormat::List => {
            for entry in manifest.entries() {
                output.print(&entry.path.to_string())?;
            }
        }

        // JSON must stay parseable in pipes, so it bypasses quiet mode.
        ListFormat::Json => println!("{}", to_json(manifest.entries())?),
    }

    Ok(())
}

fn to_json(entries: &[TemplateManifestEntry]) -> CliResult<String> {
    let items: Vec<_> = entries
        .iter()
        .map(|e| {
            json!({
                "name": e.name,
                "path": e.path.to_string(),
                "url": e.url,
            })
        })
        .collect();
    serde_json::to_string_pretty(&items).map_err(|e| CliError::config("cannot render templates", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_lists_every_entry_in_order() {
        let manifest = TemplateManifest::from_source(&AppConfig::default().templates).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&to_json(manifest.entries()).unwrap()).unwrap();
        let items = parsed.as_array().unwrap();

        assert_eq!(items.len(), 8);
        assert_eq!(items[0]["path"], ".coveragerc");
        assert_eq!(items[7]["name"], "dockerfile");
        assert!(items[7]["url"].as_str().unwrap().ends_with("/Dockerfile"));
    }

    #[test]
    fn empty_manifest_is_a_core_error() {
        let mut config = AppConfig::default();
        config.templates.entries.clear();
        let output = OutputManager::new(&Default::default(), &config);

        let err = execute(
            TemplatesArgs {
                format: ListFormat::List,
            },
            config,
            output,
        )
        .unwrap_err();

        assert!(matches!(err, CliError::Core(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
