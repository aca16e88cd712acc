//! Persistence gateway for ballotd
//!
//! Durable storage for the three record kinds (Voter, Candidate, Vote)
//! with transactional read-modify-write support.
//!
//! # Design Principles
//!
//! - Journal-first: the durable journal append happens before any
//!   in-memory mutation becomes visible
//! - Append-only journal, fsync after every append
//! - Checksum-verified on every replayed record
//! - Halt-on-corruption policy during replay
//! - The cast-vote transaction commits both effects (vote row + voter
//!   flag) in a single journal record, so replay applies both or neither

mod backend;
mod checksum;
mod errors;
mod memory;
mod reader;
mod record;
mod writer;

pub use backend::{CastOutcome, ReadSnapshot, VoteStore};
pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use reader::JournalReader;
pub use record::{JournalPayload, JournalRecord, RecordType};
pub use writer::JournalWriter;
