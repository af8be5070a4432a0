//! Interactive setup wizard for first-time configuration
//!
//! This module handles the interactive prompts for creating an initial
//! configuration when the chooser is run for the first time.

use super::{ChooserConfig, SourceConfig};
use config::ConfigError;
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::Path;

/// Interactive first-time setup - prompts for the first source site
///
/// Guides the user through registering one source:
/// 1. Prompts for a source name (default: "default")
/// 2. Prompts for the site's base URL
/// 3. Creates and saves the configuration at `path`
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - User input cannot be read
/// - The base URL is not an http(s) URL
/// - The configuration cannot be saved
pub fn first_time_setup(path: &Path) -> Result<ChooserConfig, ConfigError> {
    eprintln!("Welcome to the transfer chooser! Let's register your first source site.\n");

    let name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Source name")
        .default("default".to_string())
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let base_url: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Base URL of the source site")
        .validate_with(|input: &String| validate_base_url(input))
        .interact_text()
        .map_err(|e| ConfigError::Message(format!("Failed to read input: {e}")))?;

    let mut config = ChooserConfig::default();
    config.add_source(name, SourceConfig::new(base_url.trim()));
    config.save_to(path)?;

    eprintln!("\nConfiguration saved to {}", path.display());
    Ok(config)
}

/// Base URLs must be absolute http(s) URLs
///
/// # Errors
///
/// Returns a message describing the problem.
pub fn validate_base_url(input: &str) -> Result<(), String> {
    let input = input.trim();
    let rest = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))
        .ok_or_else(|| "URL must start with http:// or https://".to_string())?;

    if rest.trim_matches('/').is_empty() {
        return Err("URL has no host".to_string());
    }
    Ok(())
}
