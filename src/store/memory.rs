//! In-memory tables with optional journal durability
//!
//! The production store. Tables live in memory behind a `RwLock`; every
//! mutation is journaled (append + fsync) before it becomes visible, and
//! `open` rebuilds the tables by replaying the journal through the same
//! apply path used at commit time.
//!
//! The cast-vote transaction runs entirely under the write lock, so the
//! existence checks, the flag check, and the flag flip form one isolated
//! unit against the shared voter row. The only I/O under that lock is the
//! journal append, which is the storage transaction itself.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, RwLock};

use crate::voting::{Candidate, CandidateId, Vote, VoteId, Voter, VoterId};

use super::backend::{CastOutcome, ReadSnapshot, VoteStore};
use super::errors::{StoreError, StoreResult};
use super::reader::JournalReader;
use super::record::JournalPayload;
use super::writer::JournalWriter;

/// The three tables plus identity counters.
///
/// BTreeMaps keyed by the sequential ids give stable insertion-order
/// iteration for the list operations.
#[derive(Debug, Default)]
struct Tables {
    voters: BTreeMap<u64, Voter>,
    candidates: BTreeMap<u64, Candidate>,
    votes: Vec<Vote>,
    next_voter_id: u64,
    next_candidate_id: u64,
    next_vote_id: u64,
}

impl Tables {
    fn new() -> Self {
        Self {
            next_voter_id: 1,
            next_candidate_id: 1,
            next_vote_id: 1,
            ..Default::default()
        }
    }

    /// Apply a committed record to the tables.
    ///
    /// Shared by journal replay and the live commit path, so a reopened
    /// store converges on exactly the state the commits produced.
    fn apply(&mut self, payload: &JournalPayload) {
        match payload {
            JournalPayload::VoterAdded { id, name } => {
                self.voters
                    .insert(id.value(), Voter::new(*id, name.clone()));
                self.next_voter_id = self.next_voter_id.max(id.value() + 1);
            }
            JournalPayload::CandidateAdded { id, name } => {
                self.candidates
                    .insert(id.value(), Candidate::new(*id, name.clone()));
                self.next_candidate_id = self.next_candidate_id.max(id.value() + 1);
            }
            JournalPayload::VoteCast {
                vote_id,
                candidate_id,
                voter_id,
            } => {
                // Both effects of the transaction, from one record.
                self.votes.push(Vote::new(*vote_id, *candidate_id));
                if let Some(voter) = self.voters.get_mut(&voter_id.value()) {
                    voter.mark_voted();
                }
                self.next_vote_id = self.next_vote_id.max(vote_id.value() + 1);
            }
        }
    }
}

/// In-memory store, optionally backed by a durable journal.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    journal: Option<Mutex<JournalWriter>>,
}

impl MemoryStore {
    /// Create a volatile store with no journal. Used by tests and by
    /// `serve` when no data directory is configured.
    pub fn in_memory() -> Self {
        Self {
            tables: RwLock::new(Tables::new()),
            journal: None,
        }
    }

    /// Open a journal-backed store, replaying any existing journal.
    ///
    /// Replay is strict: a corrupt journal refuses to open.
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        let writer = JournalWriter::open(data_dir)?;

        let mut tables = Tables::new();
        let mut reader = JournalReader::open(writer.path())?;
        let mut replayed = 0usize;
        while let Some(record) = reader.read_next()? {
            tables.apply(&record.payload);
            replayed += 1;
        }

        tracing::info!(records = replayed, path = %writer.path().display(), "journal replayed");

        Ok(Self {
            tables: RwLock::new(tables),
            journal: Some(Mutex::new(writer)),
        })
    }

    /// Journal the payload if a journal is attached.
    ///
    /// Called with the tables lock held: the append is the commit point of
    /// the enclosing storage transaction. On error nothing has been
    /// applied, so the transaction aborts with no partial state.
    fn commit(&self, payload: &JournalPayload) -> StoreResult<()> {
        if let Some(journal) = &self.journal {
            let mut writer = journal
                .lock()
                .map_err(|_| StoreError::Poisoned("journal writer"))?;
            writer.append(payload.clone())?;
        }
        Ok(())
    }
}

impl VoteStore for MemoryStore {
    fn snapshot(&self) -> StoreResult<ReadSnapshot> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Poisoned("tables"))?;

        Ok(ReadSnapshot {
            voters: tables.voters.values().cloned().collect(),
            candidates: tables.candidates.values().cloned().collect(),
            votes: tables.votes.clone(),
        })
    }

    fn insert_voter(&self, name: &str) -> StoreResult<Voter> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Poisoned("tables"))?;

        let id = VoterId::new(tables.next_voter_id);
        let payload = JournalPayload::VoterAdded {
            id,
            name: name.to_string(),
        };

        self.commit(&payload)?;
        tables.apply(&payload);

        Ok(Voter::new(id, name))
    }

    fn insert_candidate(&self, name: &str) -> StoreResult<Candidate> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Poisoned("tables"))?;

        let id = CandidateId::new(tables.next_candidate_id);
        let payload = JournalPayload::CandidateAdded {
            id,
            name: name.to_string(),
        };

        self.commit(&payload)?;
        tables.apply(&payload);

        Ok(Candidate::new(id, name))
    }

    fn cast_vote(
        &self,
        voter_id: VoterId,
        candidate_id: CandidateId,
    ) -> StoreResult<CastOutcome> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Poisoned("tables"))?;

        // Steps 1-3: existence checks and the flag check, all under the
        // same lock that the flip will take.
        let voter = match tables.voters.get(&voter_id.value()) {
            Some(voter) => voter,
            None => return Ok(CastOutcome::VoterMissing),
        };
        if !tables.candidates.contains_key(&candidate_id.value()) {
            return Ok(CastOutcome::CandidateMissing);
        }
        if voter.has_voted {
            return Ok(CastOutcome::AlreadyVoted);
        }

        // Steps 4-6: one journal record commits both effects.
        let vote_id = VoteId::new(tables.next_vote_id);
        let payload = JournalPayload::VoteCast {
            vote_id,
            candidate_id,
            voter_id,
        };

        self.commit(&payload)?;
        tables.apply(&payload);

        Ok(CastOutcome::Committed(Vote::new(vote_id, candidate_id)))
    }
}
