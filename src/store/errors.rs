//! Store error types
//!
//! Failure modes:
//! - `WriteFailed` - a journal append, fsync, or open could not complete;
//!   the operation fails, the server continues
//! - `Corruption` - a replayed record failed framing or checksum
//!   validation; replay halts immediately, no skipping, no repair
//! - `Poisoned` - a writer panicked while holding a lock

use std::io;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence gateway errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// A durable write could not be completed
    #[error("journal write failed: {reason}")]
    WriteFailed {
        reason: String,
        #[source]
        source: Option<io::Error>,
    },

    /// The journal could not be opened or read back
    #[error("journal read failed: {reason}")]
    ReadFailed {
        reason: String,
        #[source]
        source: io::Error,
    },

    /// A replayed journal record is corrupt; startup must halt
    #[error("journal corrupted at byte offset {offset}: {reason}")]
    Corruption { offset: u64, reason: String },

    /// A lock was poisoned by a panicked holder
    #[error("store lock poisoned: {0}")]
    Poisoned(&'static str),
}

impl StoreError {
    /// Create a write failure with an underlying I/O error
    pub fn write_failed(reason: impl Into<String>, source: io::Error) -> Self {
        StoreError::WriteFailed {
            reason: reason.into(),
            source: Some(source),
        }
    }

    /// Create a write failure without an I/O source
    pub fn write_failed_no_source(reason: impl Into<String>) -> Self {
        StoreError::WriteFailed {
            reason: reason.into(),
            source: None,
        }
    }

    /// Create a read failure with an underlying I/O error
    pub fn read_failed(reason: impl Into<String>, source: io::Error) -> Self {
        StoreError::ReadFailed {
            reason: reason.into(),
            source,
        }
    }

    /// Create a corruption error with the offending byte offset
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        StoreError::Corruption {
            offset,
            reason: reason.into(),
        }
    }

    /// Returns whether this error must halt startup
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::Corruption { .. })
    }
}
