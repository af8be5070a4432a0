//! Sources command - manage the configured source sites

use crate::{
    ChooserError,
    cli::SourcesCommands,
    config::{ChooserConfig, SourceConfig, validate_base_url},
};
use colored::Colorize;
use std::path::Path;

type Result<T> = std::result::Result<T, ChooserError>;

/// Execute a sources subcommand and persist the result to `config_path`
///
/// # Errors
/// Returns an error if the source name is unknown or duplicated, the URL is
/// invalid, or the configuration cannot be saved
pub fn execute(
    config: &mut ChooserConfig,
    command: &SourcesCommands,
    config_path: &Path,
    quiet: bool,
) -> Result<()> {
    match command {
        SourcesCommands::Add {
            name,
            base_url,
            pages_endpoint,
            models_endpoint,
        } => {
            if config.get_source(name).is_some() {
                return Err(ChooserError::InvalidInput(format!(
                    "Source '{name}' already exists"
                )));
            }
            validate_base_url(base_url).map_err(ChooserError::InvalidInput)?;

            let mut source = SourceConfig::new(base_url.trim());
            if let Some(endpoint) = pages_endpoint {
                source.pages_endpoint.clone_from(endpoint);
            }
            if let Some(endpoint) = models_endpoint {
                source.models_endpoint.clone_from(endpoint);
            }
            let pages_url = source.pages_url();
            let was_empty = config.sources.is_empty();

            config.add_source(name.clone(), source);
            config.save_to(config_path)?;

            if !quiet {
                println!("Source '{name}' added ({pages_url})");
                if was_empty {
                    println!("Set '{name}' as default source");
                }
            }
        }
        SourcesCommands::List => {
            if config.sources.is_empty() {
                if !quiet {
                    println!("No sources configured.");
                    println!("Add one with: chooser sources add <name> <base-url>");
                }
                return Ok(());
            }

            if !quiet {
                println!("Configured sources:");
            }
            for name in config.list_sources() {
                let Some(source) = config.get_source(name) else {
                    continue;
                };
                if quiet {
                    println!("{name}");
                } else {
                    let is_default = config.default_source.as_ref() == Some(name);
                    let marker = if is_default {
                        " (default)".green().to_string()
                    } else {
                        String::new()
                    };
                    println!("  {} -> {}{marker}", name.bold(), source.base_url);
                }
            }
        }
        SourcesCommands::Remove { name } => {
            let was_default = config.default_source.as_ref() == Some(name);
            if config.remove_source(name).is_none() {
                return Err(ChooserError::InvalidInput(format!(
                    "Source '{name}' does not exist"
                )));
            }
            config.save_to(config_path)?;

            if !quiet {
                println!("Source '{name}' removed from configuration");
                if was_default {
                    println!("Warning: that was the default source. Set a new one with: chooser sources set-default <name>");
                }
            }
        }
        SourcesCommands::SetDefault { name } => {
            config.set_default_source(name.clone())?;
            config.save_to(config_path)?;

            if !quiet {
                println!("Set '{name}' as default source");
            }
        }
    }
    Ok(())
}
