//! Journal record types and framing
//!
//! Each journal record is laid out as:
//! - Record length (u32 LE) - covers type, sequence, and payload
//! - Record type (u8)
//! - Sequence number (u64 LE)
//! - Payload (JSON, variable)
//! - Checksum (u32 LE) - CRC32 over type, sequence, and payload
//!
//! A `VoteCast` record carries both effects of the cast-vote transaction
//! (the new vote row and the voter flag flip) so that replay applies both
//! or neither.

use serde::{Deserialize, Serialize};

use crate::voting::{CandidateId, VoteId, VoterId};

use super::checksum::compute_checksum;
use super::errors::{StoreError, StoreResult};

/// Upper bound on a single record's framed length. Anything larger is
/// treated as a corrupt length field rather than an allocation request.
pub const MAX_RECORD_LEN: u32 = 1 << 20;

/// Journal record types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordType {
    /// A voter registration
    VoterAdded = 0,
    /// A candidate registration
    CandidateAdded = 1,
    /// A committed cast-vote transaction (vote row + voter flag flip)
    VoteCast = 2,
}

impl RecordType {
    /// Convert from u8, returns None for invalid values
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(RecordType::VoterAdded),
            1 => Some(RecordType::CandidateAdded),
            2 => Some(RecordType::VoteCast),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Journal record payloads
///
/// The `op` tag makes each payload self-describing; on replay it must
/// agree with the frame's record type byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum JournalPayload {
    VoterAdded {
        id: VoterId,
        name: String,
    },
    CandidateAdded {
        id: CandidateId,
        name: String,
    },
    /// The voter id here exists so replay can flip the flag; the
    /// materialized vote row never links back to the voter.
    VoteCast {
        vote_id: VoteId,
        candidate_id: CandidateId,
        voter_id: VoterId,
    },
}

impl JournalPayload {
    /// The record type byte for this payload
    pub fn record_type(&self) -> RecordType {
        match self {
            JournalPayload::VoterAdded { .. } => RecordType::VoterAdded,
            JournalPayload::CandidateAdded { .. } => RecordType::CandidateAdded,
            JournalPayload::VoteCast { .. } => RecordType::VoteCast,
        }
    }
}

/// A framed journal record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalRecord {
    /// Sequence number, assigned by the writer, starts at 1, never reused
    pub sequence: u64,
    /// The operation this record commits
    pub payload: JournalPayload,
}

impl JournalRecord {
    pub fn new(sequence: u64, payload: JournalPayload) -> Self {
        Self { sequence, payload }
    }

    /// Serialize to the on-disk frame.
    pub fn encode(&self) -> StoreResult<Vec<u8>> {
        let body = serde_json::to_vec(&self.payload).map_err(|e| {
            StoreError::write_failed_no_source(format!(
                "failed to serialize record payload: {}",
                e
            ))
        })?;

        // type + sequence + payload, the checksummed region
        let mut inner = Vec::with_capacity(1 + 8 + body.len());
        inner.push(self.payload.record_type().as_u8());
        inner.extend_from_slice(&self.sequence.to_le_bytes());
        inner.extend_from_slice(&body);

        let checksum = compute_checksum(&inner);

        let mut frame = Vec::with_capacity(4 + inner.len() + 4);
        frame.extend_from_slice(&(inner.len() as u32).to_le_bytes());
        frame.extend_from_slice(&inner);
        frame.extend_from_slice(&checksum.to_le_bytes());

        Ok(frame)
    }
}
