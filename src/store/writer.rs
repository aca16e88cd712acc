//! Journal writer with fsync enforcement
//!
//! - Every append is followed by fsync; acknowledgment before fsync is
//!   forbidden
//! - Append-only, single file, opened with append access
//! - Sequence numbers start at 1 and are never reused

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::errors::{StoreError, StoreResult};
use super::reader::JournalReader;
use super::record::{JournalPayload, JournalRecord};

/// Journal writer that enforces fsync after every append.
#[derive(Debug)]
pub struct JournalWriter {
    /// Path to the journal file
    journal_path: PathBuf,
    /// Underlying file handle
    file: File,
    /// Next sequence number to assign
    next_sequence: u64,
}

impl JournalWriter {
    /// Opens or creates a journal at `<data_dir>/journal/journal.log`,
    /// creating parent directories if needed.
    ///
    /// The next sequence number is determined by replaying the existing
    /// journal; a corrupt journal refuses to open.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        let journal_dir = data_dir.join("journal");
        let journal_path = journal_dir.join("journal.log");

        if !journal_dir.exists() {
            fs::create_dir_all(&journal_dir).map_err(|e| {
                StoreError::write_failed(
                    format!(
                        "failed to create journal directory: {}",
                        journal_dir.display()
                    ),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&journal_path)
            .map_err(|e| {
                StoreError::write_failed(
                    format!("failed to open journal file: {}", journal_path.display()),
                    e,
                )
            })?;

        let next_sequence = Self::determine_next_sequence(&journal_path)?;

        Ok(Self {
            journal_path,
            file,
            next_sequence,
        })
    }

    /// Determines the next sequence number by scanning the existing journal.
    ///
    /// Returns 1 if the journal is empty or does not exist.
    fn determine_next_sequence(journal_path: &Path) -> StoreResult<u64> {
        let metadata = match fs::metadata(journal_path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(1),
            Err(e) => {
                return Err(StoreError::read_failed(
                    "failed to read journal metadata",
                    e,
                ))
            }
        };

        if metadata.len() == 0 {
            return Ok(1);
        }

        let mut reader = JournalReader::open(journal_path)?;
        let mut max_sequence = 0u64;

        while let Some(record) = reader.read_next()? {
            max_sequence = max_sequence.max(record.sequence);
        }

        Ok(max_sequence + 1)
    }

    /// Returns the path to the journal file.
    pub fn path(&self) -> &Path {
        &self.journal_path
    }

    /// Returns the next sequence number that will be assigned.
    pub fn next_sequence_number(&self) -> u64 {
        self.next_sequence
    }

    /// Appends a record with fsync enforcement.
    ///
    /// 1. Frame the record
    /// 2. Append to the journal file
    /// 3. fsync
    /// 4. Only after fsync may the operation proceed
    ///
    /// Returns the sequence number assigned to this record.
    pub fn append(&mut self, payload: JournalPayload) -> StoreResult<u64> {
        let sequence = self.next_sequence;
        let record = JournalRecord::new(sequence, payload);
        let frame = record.encode()?;

        self.file.write_all(&frame).map_err(|e| {
            StoreError::write_failed(
                format!("failed to write journal record at sequence {}", sequence),
                e,
            )
        })?;

        self.file.sync_all().map_err(|e| {
            StoreError::write_failed(
                format!("fsync failed after journal append at sequence {}", sequence),
                e,
            )
        })?;

        // Only increment after successful fsync
        self.next_sequence += 1;

        Ok(sequence)
    }
}
