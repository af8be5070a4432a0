//! Transfer chooser CLI entry point
//!
//! Browses a configured source site and prints the chosen item as one JSON
//! line on stdout. Everything interactive (the listing, prompts, logs) goes
//! to stderr, so the result can be piped into the import workflow.
//!
//! # Usage
//!
//! ```bash
//! # Choose a page, starting at the root (default command)
//! chooser
//! chooser pages --parent 42 --type blog.BlogPage
//!
//! # Choose a model record
//! chooser models --model blog.category
//!
//! # Manage source sites
//! chooser sources add staging https://staging.example.com
//! chooser sources set-default staging
//!
//! # Debug logging of requests and state transitions
//! chooser -v pages
//! RUST_LOG=transfer_chooser=trace chooser models
//! ```
//!
//! # Configuration
//!
//! On first run the chooser prompts for a source site. Configuration is
//! stored in the user's config directory
//! (`~/.config/transfer-chooser/config.toml` on Linux).

use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use transfer_chooser::{
    ChooserError,
    adapter::{ModelsAdapter, PagesAdapter, ResourceAdapter},
    api::{HttpTransport, ReqwestTransport},
    cli::{Cli, Commands},
    commands,
    config::ChooserConfig,
    output,
    resource::{BrowseTarget, ModelLabel, PageId, TypeFilter},
    selection::{SelectionEmitter, SelectionReceiver},
    session::{ChooserSession, SessionConfig},
    ui::DialoguerInput,
};

type Result<T> = std::result::Result<T, ChooserError>;

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Build the session for a chooser command
fn build_session(
    config: &ChooserConfig,
    command: &Commands,
    source_name: Option<&str>,
) -> Result<(String, ChooserSession, SelectionReceiver)> {
    let (name, source) = config.resolve_source(source_name)?;
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(config.timeout())?);

    let (adapter, session_config): (Arc<dyn ResourceAdapter>, SessionConfig) = match command {
        Commands::Pages { parent, page_types } => (
            Arc::new(PagesAdapter::new(transport, source.pages_url())),
            SessionConfig {
                seed: parent.map_or(BrowseTarget::Root, |id| BrowseTarget::Page(PageId(id))),
                type_filter: TypeFilter::new(page_types).or_else(|| config.type_filter()),
                root_page_id: config.root_page_id(),
            },
        ),
        Commands::Models { model } => (
            Arc::new(ModelsAdapter::new(transport, source.models_url())),
            SessionConfig {
                seed: model.as_ref().map_or(BrowseTarget::Root, |label| {
                    BrowseTarget::Model(ModelLabel::new(label.to_lowercase()))
                }),
                type_filter: None,
                root_page_id: config.root_page_id(),
            },
        ),
        Commands::Sources { .. } | Commands::Completions { .. } => {
            return Err(ChooserError::InvalidInput("Not a chooser command".to_string()));
        }
    };

    let (emitter, receiver) = SelectionEmitter::channel();
    Ok((
        name.to_string(),
        ChooserSession::new(adapter, emitter, session_config),
        receiver,
    ))
}

/// Main entry point for the chooser
///
/// Parses command-line arguments, loads configuration and dispatches to the
/// appropriate command handler.
///
/// # Errors
///
/// Returns `ChooserError` if configuration loading fails, the session cannot
/// be built, or any command handler returns an error.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(&cli);

    let quiet = cli.quiet;
    let command = cli.get_command();

    match &command {
        Commands::Completions { shell } => {
            commands::completions(*shell, &mut io::stdout());
        }
        Commands::Sources { command } => {
            let config_path = ChooserConfig::config_path()?;
            let mut config = ChooserConfig::load_from(&config_path)?;
            commands::sources(&mut config, command, &config_path, quiet)?;
        }
        Commands::Pages { .. } | Commands::Models { .. } => {
            let config = ChooserConfig::load_or_setup()?;
            let (source, mut session, receiver) =
                build_session(&config, &command, cli.source.as_deref())?;
            let kind = session.kind();

            commands::choose(&mut session, &DialoguerInput::new(), quiet).await?;

            match receiver.await {
                Ok(chosen) => println!("{}", output::chosen_json(&source, kind, &chosen)?),
                Err(_) => {
                    if !quiet {
                        eprintln!("Chooser cancelled.");
                    }
                }
            }
        }
    }

    Ok(())
}
