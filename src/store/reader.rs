//! Journal reader with strict corruption detection
//!
//! Zero tolerance policy:
//! - If any corruption is detected, replay halts immediately
//! - No partial replay, no skipping records, no repair attempts
//!
//! Records are replayed strictly in file order, which is sequence order
//! by construction of the writer.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use super::checksum::verify_checksum;
use super::errors::{StoreError, StoreResult};
use super::record::{JournalPayload, JournalRecord, RecordType, MAX_RECORD_LEN};

/// Journal reader for sequential replay.
pub struct JournalReader {
    /// Path to the journal file
    journal_path: PathBuf,
    /// Buffered reader for efficient sequential reads
    reader: BufReader<File>,
    /// Current byte offset in the file
    current_offset: u64,
    /// Total file size
    file_size: u64,
    /// Last successfully read sequence number
    last_sequence: u64,
}

impl JournalReader {
    /// Opens a journal file for reading.
    pub fn open(journal_path: &Path) -> StoreResult<Self> {
        let file = File::open(journal_path).map_err(|e| {
            StoreError::read_failed(
                format!("failed to open journal file: {}", journal_path.display()),
                e,
            )
        })?;

        let metadata = file
            .metadata()
            .map_err(|e| StoreError::read_failed("failed to read journal metadata", e))?;

        Ok(Self {
            journal_path: journal_path.to_path_buf(),
            reader: BufReader::new(file),
            current_offset: 0,
            file_size: metadata.len(),
            last_sequence: 0,
        })
    }

    /// Opens the journal from a data directory.
    ///
    /// Expects the journal at `<data_dir>/journal/journal.log`.
    pub fn open_from_data_dir(data_dir: &Path) -> StoreResult<Self> {
        let journal_path = data_dir.join("journal").join("journal.log");
        Self::open(&journal_path)
    }

    /// Returns the path to the journal file.
    pub fn path(&self) -> &Path {
        &self.journal_path
    }

    /// Reads the next record, or `None` at a clean end of file.
    ///
    /// Any framing violation, checksum mismatch, or truncated record is
    /// corruption and carries the offending byte offset.
    pub fn read_next(&mut self) -> StoreResult<Option<JournalRecord>> {
        let record_offset = self.current_offset;

        if self.current_offset == self.file_size {
            return Ok(None);
        }

        // Record length (u32 LE)
        let len = u32::from_le_bytes(self.read_exact::<4>(record_offset, "record length")?);
        // A record is at least a type byte and a sequence number.
        if len < 9 || len > MAX_RECORD_LEN {
            return Err(StoreError::corruption_at_offset(
                record_offset,
                format!("implausible record length {}", len),
            ));
        }

        // Checksummed region: type + sequence + payload
        let mut inner = vec![0u8; len as usize];
        self.read_into(&mut inner, record_offset, "record body")?;

        // Checksum (u32 LE)
        let expected = u32::from_le_bytes(self.read_exact::<4>(record_offset, "checksum")?);
        if !verify_checksum(&inner, expected) {
            return Err(StoreError::corruption_at_offset(
                record_offset,
                "checksum mismatch",
            ));
        }

        let type_byte = inner[0];
        let record_type = RecordType::from_u8(type_byte).ok_or_else(|| {
            StoreError::corruption_at_offset(
                record_offset,
                format!("unknown record type {}", type_byte),
            )
        })?;

        let mut seq_bytes = [0u8; 8];
        seq_bytes.copy_from_slice(&inner[1..9]);
        let sequence = u64::from_le_bytes(seq_bytes);
        if sequence <= self.last_sequence {
            return Err(StoreError::corruption_at_offset(
                record_offset,
                format!(
                    "non-monotonic sequence {} after {}",
                    sequence, self.last_sequence
                ),
            ));
        }

        let payload: JournalPayload = serde_json::from_slice(&inner[9..]).map_err(|e| {
            StoreError::corruption_at_offset(
                record_offset,
                format!("undecodable record payload: {}", e),
            )
        })?;

        if payload.record_type() != record_type {
            return Err(StoreError::corruption_at_offset(
                record_offset,
                format!(
                    "record type byte {} disagrees with payload tag",
                    type_byte
                ),
            ));
        }

        self.last_sequence = sequence;

        Ok(Some(JournalRecord::new(sequence, payload)))
    }

    /// Reads every remaining record, failing on the first corruption.
    pub fn read_all(&mut self) -> StoreResult<Vec<JournalRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }

    fn read_exact<const N: usize>(
        &mut self,
        record_offset: u64,
        what: &str,
    ) -> StoreResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_into(&mut buf, record_offset, what)?;
        Ok(buf)
    }

    fn read_into(&mut self, buf: &mut [u8], record_offset: u64, what: &str) -> StoreResult<()> {
        self.reader.read_exact(buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                StoreError::corruption_at_offset(
                    record_offset,
                    format!("truncated record: unexpected end of file in {}", what),
                )
            } else {
                StoreError::corruption_at_offset(record_offset, format!("read failed: {}", e))
            }
        })?;
        self.current_offset += buf.len() as u64;
        Ok(())
    }
}
