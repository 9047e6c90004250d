//! CLI entrypoint for cinevote
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;
mod handlers;

use anyhow::{Result, bail};
use clap::Parser;
use cinevote_application::{CatalogService, ports::{DocumentStore, EventLog, NoEventLog}};
use cinevote_domain::DocumentSnapshot;
use cinevote_infrastructure::{
    ConfigLoader, FileConfig, GdocsDocumentStore, InMemoryDocumentStore, JsonlEventLogger,
};
use commands::{Cli, Command};
use handlers::{App, vote_parameters};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };
    let _guard = init_logging(filter);

    info!("Starting cinevote");

    if cli.show_config {
        show_config_locations();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())?
    };

    // === Dependency Injection ===
    // Offline snapshot mode swaps the remote store for an in-memory one;
    // everything above the store is identical.
    match &cli.snapshot {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let snapshot: DocumentSnapshot = serde_json::from_str(&text)?;
            let store = Arc::new(InMemoryDocumentStore::new(snapshot));
            run(cli.command, store, &config).await
        }
        None => {
            if config.document.doc_id.is_empty() {
                bail!(
                    "no document configured. Set [document].doc_id in the config file, \
                     or use --snapshot FILE for offline mode."
                );
            }
            let store = Arc::new(GdocsDocumentStore::new(
                &config.document.doc_id,
                &config.document.api_token,
            ));
            run(cli.command, store, &config).await
        }
    }
}

async fn run<S: DocumentStore + 'static>(
    command: Command,
    store: Arc<S>,
    config: &FileConfig,
) -> Result<()> {
    let event_log = open_event_log();
    let parse_config = config.document.to_parse_config();
    let catalog = CatalogService::new(
        Arc::clone(&store),
        parse_config.clone(),
        config.matcher.to_matcher_config(),
    )
    .with_event_log(Arc::clone(&event_log));

    let app = App::new(
        store,
        catalog,
        parse_config,
        config.list.page_size.max(1),
        event_log,
    );

    match command {
        Command::List { scope, page } => app.list(scope.to_scope(), page).await,
        Command::Pick { proposer } => app.pick(proposer.as_deref()).await,
        Command::Search { query, by, scope } => app.search(&query, by, scope.to_scope()).await,
        Command::Resolve { title } => app.resolve(&title).await,
        Command::Vote {
            count,
            max_votes,
            minutes,
            tie,
        } => {
            let (count, max_votes, minutes) =
                vote_parameters(count, max_votes, minutes, &config.voting);
            app.vote(count, max_votes, minutes, tie).await
        }
        Command::Inspect => app.inspect().await,
    }
}

/// Console logs go to stderr (stdout is command output); everything also
/// lands in a daily-rolling file under the platform data directory.
fn init_logging(filter: EnvFilter) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_dir = dirs::data_dir()
        .map(|d| d.join("cinevote").join("logs"))
        .filter(|dir| std::fs::create_dir_all(dir).is_ok());

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "cinevote.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
                .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}

/// Activity events (votes, sessions, resolves) go to a JSONL file next to
/// the operation logs. Falls back to a no-op when the file can't be opened.
fn open_event_log() -> Arc<dyn EventLog> {
    let path = dirs::data_dir().map(|d| d.join("cinevote").join("logs").join("activity.jsonl"));
    match path.and_then(JsonlEventLogger::new) {
        Some(logger) => Arc::new(logger),
        None => Arc::new(NoEventLog),
    }
}

fn show_config_locations() {
    match ConfigLoader::global_config_path() {
        Some(path) => {
            let exists = if path.exists() { "present" } else { "absent" };
            println!("Global config: {} ({})", path.display(), exists);
        }
        None => println!("Global config: unavailable on this platform"),
    }
    match ConfigLoader::project_config_path() {
        Some(path) => println!("Project config: {}", path.display()),
        None => println!("Project config: none found"),
    }
}
