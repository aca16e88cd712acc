//! The voting service
//!
//! Owns every transition of `Voter::has_voted` and all creation of vote
//! records. No other component mutates these. Infrastructure failures are
//! logged here with full context and surfaced to callers as a generic
//! `Persistence` error so storage internals never leak outward.

use std::collections::HashMap;
use std::sync::Arc;

use crate::store::{CastOutcome, VoteStore};

use super::errors::{
    VotingError, VotingResult, CANDIDATE_ADD_FAILURE, VOTER_ADD_FAILURE, VOTING_FAILURE,
};
use super::model::{Candidate, CandidateId, Vote, Voter, VoterId};

/// A candidate together with its tally.
///
/// The tally is aggregated from committed vote records at read time; no
/// stored counter exists anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTally {
    pub id: CandidateId,
    pub name: String,
    pub votes: usize,
}

/// The voting domain service.
pub struct VotingService {
    store: Arc<dyn VoteStore>,
}

impl VotingService {
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self { store }
    }

    /// Read-only snapshot of all voters, in stable insertion order.
    pub fn list_voters(&self) -> VotingResult<Vec<Voter>> {
        let snapshot = self.store.snapshot().map_err(|e| {
            tracing::error!(error = %e, "listing voters failed");
            VotingError::Persistence {
                code: VOTING_FAILURE,
            }
        })?;
        Ok(snapshot.voters)
    }

    /// Register a new voter.
    pub fn register_voter(&self, name: &str) -> VotingResult<Voter> {
        match self.store.insert_voter(name) {
            Ok(voter) => {
                tracing::info!(voter = %voter.id, "voter registered");
                Ok(voter)
            }
            Err(e) => {
                tracing::error!(error = %e, "adding a voter failed");
                Err(VotingError::Persistence {
                    code: VOTER_ADD_FAILURE,
                })
            }
        }
    }

    /// Read-only snapshot of all candidates with their tallies.
    ///
    /// Candidates and votes come from the same snapshot, so each tally is
    /// the exact count of committed vote records for that candidate.
    pub fn list_candidates(&self) -> VotingResult<Vec<CandidateTally>> {
        let snapshot = self.store.snapshot().map_err(|e| {
            tracing::error!(error = %e, "listing candidates failed");
            VotingError::Persistence {
                code: VOTING_FAILURE,
            }
        })?;

        let mut counts: HashMap<CandidateId, usize> = HashMap::new();
        for vote in &snapshot.votes {
            *counts.entry(vote.candidate_id).or_default() += 1;
        }

        Ok(snapshot
            .candidates
            .into_iter()
            .map(|candidate| CandidateTally {
                votes: counts.get(&candidate.id).copied().unwrap_or(0),
                id: candidate.id,
                name: candidate.name,
            })
            .collect())
    }

    /// Register a new candidate.
    pub fn register_candidate(&self, name: &str) -> VotingResult<Candidate> {
        match self.store.insert_candidate(name) {
            Ok(candidate) => {
                tracing::info!(candidate = %candidate.id, "candidate registered");
                Ok(candidate)
            }
            Err(e) => {
                tracing::error!(error = %e, "adding a candidate failed");
                Err(VotingError::Persistence {
                    code: CANDIDATE_ADD_FAILURE,
                })
            }
        }
    }

    /// Cast a vote: the invariant-checked transaction.
    ///
    /// Of two concurrent casts for the same voter exactly one succeeds;
    /// the other observes the committed flag and is rejected with
    /// `AlreadyVoted`. On any failure nothing is committed.
    pub fn cast_vote(&self, voter_id: VoterId, candidate_id: CandidateId) -> VotingResult<Vote> {
        let outcome = self.store.cast_vote(voter_id, candidate_id).map_err(|e| {
            tracing::error!(voter = %voter_id, candidate = %candidate_id, error = %e, "voting failed");
            VotingError::Persistence {
                code: VOTING_FAILURE,
            }
        })?;

        match outcome {
            CastOutcome::Committed(vote) => {
                tracing::info!(candidate = %candidate_id, vote = %vote.id, "vote cast");
                Ok(vote)
            }
            CastOutcome::VoterMissing => Err(VotingError::voter_not_found(voter_id)),
            CastOutcome::CandidateMissing => Err(VotingError::candidate_not_found(candidate_id)),
            CastOutcome::AlreadyVoted => {
                tracing::warn!(voter = %voter_id, "repeated cast rejected");
                Err(VotingError::AlreadyVoted { voter: voter_id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, ReadSnapshot, StoreError, StoreResult};
    use crate::voting::Subject;

    fn service() -> VotingService {
        VotingService::new(Arc::new(MemoryStore::in_memory()))
    }

    /// Store double whose durable writes always fail.
    struct FailingStore;

    impl VoteStore for FailingStore {
        fn snapshot(&self) -> StoreResult<ReadSnapshot> {
            Ok(ReadSnapshot::default())
        }

        fn insert_voter(&self, _name: &str) -> StoreResult<Voter> {
            Err(StoreError::write_failed_no_source("disk full"))
        }

        fn insert_candidate(&self, _name: &str) -> StoreResult<Candidate> {
            Err(StoreError::write_failed_no_source("disk full"))
        }

        fn cast_vote(
            &self,
            _voter_id: VoterId,
            _candidate_id: CandidateId,
        ) -> StoreResult<CastOutcome> {
            Err(StoreError::write_failed_no_source("disk full"))
        }
    }

    #[test]
    fn test_list_voters_empty_state() {
        assert!(service().list_voters().unwrap().is_empty());
    }

    #[test]
    fn test_register_voter_returns_fresh_identity() {
        let service = service();
        let voter = service.register_voter("Peppa").unwrap();

        assert_eq!(voter.id, VoterId::new(1));
        assert_eq!(voter.name, "Peppa");
        assert!(!voter.has_voted);

        let voters = service.list_voters().unwrap();
        assert_eq!(voters, vec![voter]);
    }

    #[test]
    fn test_list_candidates_aggregates_tallies() {
        let service = service();
        let johnny = service.register_candidate("Johnny Bravo").unwrap();
        let pluto = service.register_candidate("Pluto").unwrap();

        for name in ["Peppa", "Rumcajs", "Bolek"] {
            let voter = service.register_voter(name).unwrap();
            service.cast_vote(voter.id, johnny.id).unwrap();
        }

        let tallies = service.list_candidates().unwrap();
        assert_eq!(tallies.len(), 2);
        assert_eq!(tallies[0].name, "Johnny Bravo");
        assert_eq!(tallies[0].votes, 3);
        assert_eq!(tallies[1].id, pluto.id);
        assert_eq!(tallies[1].votes, 0);
    }

    #[test]
    fn test_cast_vote_flips_flag_and_counts() {
        let service = service();
        let voter = service.register_voter("Peppa").unwrap();
        let candidate = service.register_candidate("Pluto").unwrap();

        service.cast_vote(voter.id, candidate.id).unwrap();

        assert!(service.list_voters().unwrap()[0].has_voted);
        assert_eq!(service.list_candidates().unwrap()[0].votes, 1);
    }

    #[test]
    fn test_second_cast_is_rejected_and_tally_unchanged() {
        let service = service();
        let voter = service.register_voter("Peppa").unwrap();
        let candidate = service.register_candidate("Pluto").unwrap();

        service.cast_vote(voter.id, candidate.id).unwrap();
        let err = service.cast_vote(voter.id, candidate.id).unwrap_err();

        assert_eq!(err, VotingError::AlreadyVoted { voter: voter.id });
        assert_eq!(service.list_candidates().unwrap()[0].votes, 1);
    }

    #[test]
    fn test_unknown_voter_is_not_found() {
        let service = service();
        let candidate = service.register_candidate("Pluto").unwrap();

        let err = service
            .cast_vote(VoterId::new(99), candidate.id)
            .unwrap_err();
        assert_eq!(
            err,
            VotingError::NotFound {
                subject: Subject::Voter,
                id: 99
            }
        );
        assert_eq!(service.list_candidates().unwrap()[0].votes, 0);
    }

    #[test]
    fn test_unknown_candidate_is_not_found_and_flag_untouched() {
        let service = service();
        let voter = service.register_voter("Peppa").unwrap();

        let err = service
            .cast_vote(voter.id, CandidateId::new(99))
            .unwrap_err();
        assert_eq!(
            err,
            VotingError::NotFound {
                subject: Subject::Candidate,
                id: 99
            }
        );
        assert!(!service.list_voters().unwrap()[0].has_voted);
    }

    #[test]
    fn test_store_failures_surface_as_generic_persistence_errors() {
        let service = VotingService::new(Arc::new(FailingStore));

        let err = service.register_voter("Peppa").unwrap_err();
        assert_eq!(err.code(), "VOTER_ADD_FAILURE");

        let err = service.register_candidate("Pluto").unwrap_err();
        assert_eq!(err.code(), "CANDIDATE_ADD_FAILURE");

        let err = service
            .cast_vote(VoterId::new(1), CandidateId::new(1))
            .unwrap_err();
        assert_eq!(err.code(), "VOTING_FAILURE");
        assert!(!err.to_string().contains("disk full"));
    }
}
