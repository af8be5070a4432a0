//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for the chooser using the `clap`
//! crate.
//!
//! # Commands
//!
//! - **pages**: Interactive page chooser (default)
//! - **models**: Interactive model record chooser
//! - **sources**: Manage source sites (add, remove, list, set-default)
//! - **completions**: Print a shell completion script
//!
//! # Examples
//!
//! ```no_run
//! use transfer_chooser::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_args();
//! if let Commands::Pages { parent, .. } = cli.get_command() {
//!     println!("starting below {parent:?}");
//! }
//! ```

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Source management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SourcesCommands {
    /// Register a source site
    Add {
        /// Name of the source
        name: String,

        /// Base URL of the site
        base_url: String,

        /// Page listing endpoint (relative to the base URL, or absolute)
        #[arg(long = "pages-endpoint", value_name = "PATH")]
        pages_endpoint: Option<String>,

        /// Model listing endpoint (relative to the base URL, or absolute)
        #[arg(long = "models-endpoint", value_name = "PATH")]
        models_endpoint: Option<String>,
    },

    /// List all sources
    #[command(visible_alias = "ls")]
    List,

    /// Remove a source from configuration
    #[command(visible_alias = "rm")]
    Remove {
        /// Name of the source to remove
        name: String,
    },

    /// Set the default source
    #[command(name = "set-default")]
    SetDefault {
        /// Name of the source to set as default
        name: String,
    },
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "chooser")]
#[command(about = "Pick a page or model record from a content-transfer source", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Suppress informational output (only print the result)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Log requests and state transitions to stderr
    #[arg(short = 'v', long = "verbose", global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Source site to browse (defaults to the configured default)
    #[arg(short = 's', long = "source", value_name = "NAME", global = true)]
    pub source: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Choose a page (default)
    #[command(visible_alias = "p")]
    Pages {
        /// Page id to start browsing from (default: the root)
        #[arg(long = "parent", value_name = "ID")]
        parent: Option<u64>,

        /// Restrict choosable pages to these types (app_label.ModelName)
        #[arg(short = 't', long = "type", value_name = "APP.MODEL", num_args = 1..)]
        page_types: Vec<String>,
    },

    /// Choose a model record
    #[command(visible_alias = "m")]
    Models {
        /// Model type to start in (app_label.model_name)
        #[arg(long = "model", value_name = "APP.MODEL")]
        model: Option<String>,
    },

    /// Manage source sites
    Sources {
        #[command(subcommand)]
        command: SourcesCommands,
    },

    /// Print a shell completion script
    Completions {
        /// Target shell
        shell: Shell,
    },
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the command, defaulting to the page chooser if none specified
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Pages {
            parent: None,
            page_types: Vec::new(),
        })
    }

    /// Default log filter implied by the verbosity flags
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}
