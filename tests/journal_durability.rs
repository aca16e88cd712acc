//! Journal Durability Tests
//!
//! - A reopened store converges on exactly the committed state
//! - Vote and flag are replayed from one record: both or neither
//! - Corrupt journals refuse to replay

use std::sync::Arc;

use tempfile::TempDir;

use ballotd::store::{MemoryStore, StoreError, VoteStore};
use ballotd::voting::VotingService;

// =============================================================================
// Replay Tests
// =============================================================================

/// Reopening restores voters, candidates, votes, and flags.
#[test]
fn test_reopen_restores_committed_state() {
    let dir = TempDir::new().unwrap();

    {
        let service = VotingService::new(Arc::new(MemoryStore::open(dir.path()).unwrap()));
        let voter = service.register_voter("Peppa").unwrap();
        service.register_voter("Rumcajs").unwrap();
        let candidate = service.register_candidate("Pluto").unwrap();
        service.cast_vote(voter.id, candidate.id).unwrap();
    }

    let service = VotingService::new(Arc::new(MemoryStore::open(dir.path()).unwrap()));

    let voters = service.list_voters().unwrap();
    assert_eq!(voters.len(), 2);
    assert_eq!(voters[0].name, "Peppa");
    assert!(voters[0].has_voted);
    assert!(!voters[1].has_voted);

    let tallies = service.list_candidates().unwrap();
    assert_eq!(tallies.len(), 1);
    assert_eq!(tallies[0].name, "Pluto");
    assert_eq!(tallies[0].votes, 1);
}

/// The one-vote invariant survives a restart: the replayed flag still
/// rejects a second cast.
#[test]
fn test_replayed_flag_still_rejects_second_cast() {
    let dir = TempDir::new().unwrap();

    {
        let service = VotingService::new(Arc::new(MemoryStore::open(dir.path()).unwrap()));
        let voter = service.register_voter("Peppa").unwrap();
        let candidate = service.register_candidate("Pluto").unwrap();
        service.cast_vote(voter.id, candidate.id).unwrap();
    }

    let service = VotingService::new(Arc::new(MemoryStore::open(dir.path()).unwrap()));
    let voter_id = service.list_voters().unwrap()[0].id;
    let candidate_id = service.list_candidates().unwrap()[0].id;

    assert!(service.cast_vote(voter_id, candidate_id).is_err());
    assert_eq!(service.list_candidates().unwrap()[0].votes, 1);
}

/// Identity assignment continues after the highest replayed id.
#[test]
fn test_identities_continue_after_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let store = MemoryStore::open(dir.path()).unwrap();
        store.insert_voter("Peppa").unwrap();
        store.insert_voter("Rumcajs").unwrap();
    }

    let store = MemoryStore::open(dir.path()).unwrap();
    let voter = store.insert_voter("Bolek").unwrap();
    assert_eq!(voter.id.value(), 3);

    let ids: Vec<_> = store
        .snapshot()
        .unwrap()
        .voters
        .iter()
        .map(|v| v.id.value())
        .collect();
    assert_eq!(ids, [1, 2, 3]);
}

// =============================================================================
// Corruption Tests
// =============================================================================

fn journal_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("journal").join("journal.log")
}

fn seed(dir: &TempDir) {
    let service = VotingService::new(Arc::new(MemoryStore::open(dir.path()).unwrap()));
    let voter = service.register_voter("Peppa").unwrap();
    let candidate = service.register_candidate("Pluto").unwrap();
    service.cast_vote(voter.id, candidate.id).unwrap();
}

/// A torn tail (partial final record) halts replay; nothing is skipped.
#[test]
fn test_torn_tail_refuses_to_open() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    let path = journal_path(&dir);
    let len = std::fs::metadata(&path).unwrap().len();
    let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(len - 3).unwrap();

    let err = MemoryStore::open(dir.path()).unwrap_err();
    assert!(err.is_fatal(), "expected fatal corruption, got: {}", err);
}

/// A flipped payload byte fails the checksum and halts replay.
#[test]
fn test_bit_flip_refuses_to_open() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    let path = journal_path(&dir);
    let mut bytes = std::fs::read(&path).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0x40;
    std::fs::write(&path, &bytes).unwrap();

    let err = MemoryStore::open(dir.path()).unwrap_err();
    assert!(matches!(err, StoreError::Corruption { .. }), "{}", err);
}

/// An untouched journal opens cleanly after the corruption tests' setup,
/// proving the seeds themselves are valid.
#[test]
fn test_clean_journal_opens() {
    let dir = TempDir::new().unwrap();
    seed(&dir);

    let store = MemoryStore::open(dir.path()).unwrap();
    assert_eq!(store.snapshot().unwrap().votes.len(), 1);
}
