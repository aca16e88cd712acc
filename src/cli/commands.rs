//! CLI command implementations
//!
//! `serve` owns the whole boot sequence: logging, store open (with strict
//! journal replay), service construction, and the HTTP serving loop. A
//! corrupt journal refuses to boot.

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::store::{JournalWriter, MemoryStore};
use crate::voting::VotingService;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Dispatch a parsed CLI invocation.
pub fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Init { data_dir } => init(&data_dir),
        Command::Serve {
            config,
            data_dir,
            host,
            port,
        } => {
            let server_config = match config {
                Some(path) => HttpServerConfig::load(&path).map_err(|e| {
                    CliError::config_error(format!(
                        "failed to load config {}: {}",
                        path.display(),
                        e
                    ))
                })?,
                None => HttpServerConfig {
                    host,
                    port,
                    ..Default::default()
                },
            };
            serve(data_dir.as_deref(), server_config)
        }
    }
}

/// Initialize a data directory: create it and an empty journal.
pub fn init(data_dir: &Path) -> CliResult<()> {
    let writer = JournalWriter::open(data_dir)?;
    println!("initialized data directory: {}", data_dir.display());
    println!("journal: {}", writer.path().display());
    Ok(())
}

/// Boot the store and serve the voting API until interrupted.
pub fn serve(data_dir: Option<&Path>, config: HttpServerConfig) -> CliResult<()> {
    init_logging();

    let store = match data_dir {
        Some(dir) => MemoryStore::open(dir)?,
        None => {
            tracing::warn!("no --data-dir given; votes will not survive a restart");
            MemoryStore::in_memory()
        }
    };

    let service = Arc::new(VotingService::new(Arc::new(store)));
    let server = HttpServer::with_config(service, config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::config_error(format!("failed to build runtime: {}", e)))?;

    runtime.block_on(server.start())?;

    Ok(())
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ballotd=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
