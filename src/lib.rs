//! ballotd - a small, strict voting service
//!
//! Voters and candidates are registered over HTTP; each voter may cast
//! exactly one vote for one candidate. All invariants are enforced by the
//! voting service on top of a journal-backed store.

pub mod cli;
pub mod http_server;
pub mod store;
pub mod voting;
