//! Storage backend seam
//!
//! `VoteStore` is the capability the voting service depends on. It is
//! object safe so the service can hold `Arc<dyn VoteStore>` and tests can
//! substitute failing doubles.

use crate::voting::{Candidate, CandidateId, Vote, Voter, VoterId};

use super::errors::StoreResult;

/// Consistent point-in-time view of all three tables.
///
/// Both registries read from one snapshot so a tally can never disagree
/// with the vote rows it was computed from.
#[derive(Debug, Clone, Default)]
pub struct ReadSnapshot {
    /// Voters in stable insertion order
    pub voters: Vec<Voter>,
    /// Candidates in stable insertion order
    pub candidates: Vec<Candidate>,
    /// All committed vote records
    pub votes: Vec<Vote>,
}

/// Outcome of the transactional cast-vote primitive.
///
/// The store reports which step of the transaction rejected; the voting
/// service owns turning that into a typed error. Exactly one outcome is
/// produced per call, decided inside a single isolated unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastOutcome {
    /// Vote record created and voter flag flipped in one durable commit
    Committed(Vote),
    /// The voter id did not resolve; nothing was written
    VoterMissing,
    /// The candidate id did not resolve; nothing was written
    CandidateMissing,
    /// The voter's flag was already set; nothing was written
    AlreadyVoted,
}

/// Transactional storage for voters, candidates, and votes.
pub trait VoteStore: Send + Sync {
    /// Take a consistent snapshot of all three tables.
    fn snapshot(&self) -> StoreResult<ReadSnapshot>;

    /// Durably create a voter with a fresh identity and `has_voted = false`.
    fn insert_voter(&self, name: &str) -> StoreResult<Voter>;

    /// Durably create a candidate with a fresh identity.
    fn insert_candidate(&self, name: &str) -> StoreResult<Candidate>;

    /// Execute the cast-vote transaction as one isolated unit:
    /// voter lookup, candidate lookup, flag check, vote insert, flag flip.
    ///
    /// Two concurrent calls for the same voter must not both commit; the
    /// loser observes `AlreadyVoted`. An `Err` means the durable commit
    /// itself failed, in which case no partial state is visible.
    fn cast_vote(&self, voter_id: VoterId, candidate_id: CandidateId)
        -> StoreResult<CastOutcome>;
}
