//! CLI argument definitions using clap
//!
//! Commands:
//! - ballotd init --data-dir <path>
//! - ballotd serve [--data-dir <path>] [--host <host>] [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ballotd - a small, strict voting service
#[derive(Parser, Debug)]
#[command(name = "ballotd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new ballotd data directory
    Init {
        /// Path to the data directory
        #[arg(long, default_value = "./ballotd-data")]
        data_dir: PathBuf,
    },

    /// Start the voting server
    Serve {
        /// Path to a server configuration file; overrides --host and --port
        #[arg(long)]
        config: Option<PathBuf>,

        /// Path to the data directory; omit for a volatile in-memory store
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to bind to
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["ballotd", "serve"]).unwrap();
        match cli.command {
            Command::Serve {
                config,
                data_dir,
                host,
                port,
            } => {
                assert!(config.is_none());
                assert!(data_dir.is_none());
                assert_eq!(host, "0.0.0.0");
                assert_eq!(port, 8080);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_init_takes_data_dir() {
        let cli = Cli::try_parse_from(["ballotd", "init", "--data-dir", "/tmp/votes"]).unwrap();
        match cli.command {
            Command::Init { data_dir } => {
                assert_eq!(data_dir, PathBuf::from("/tmp/votes"));
            }
            _ => panic!("expected init"),
        }
    }
}
