//! # ballotd HTTP Server Module
//!
//! The request boundary: parses and validates requests, invokes the
//! voting service, and translates domain results and errors into
//! responses.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/voting/voters` - List and register voters
//! - `/voting/candidates` - List and register candidates
//! - `/voting/cast-vote` - The cast-vote transaction

pub mod config;
pub mod health;
pub mod server;
pub mod voting_routes;

pub use config::HttpServerConfig;
pub use server::HttpServer;
