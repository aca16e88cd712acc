//! Voting domain service
//!
//! Enforces every rule above the storage layer:
//! - referential integrity (voter and candidate must exist)
//! - the one-vote-per-voter invariant
//! - atomic commit of the combined state change (new vote + voter flag)
//!
//! This module provides:
//! - `VoterId` / `CandidateId` / `VoteId` - store-assigned identities
//! - `Voter` / `Candidate` / `Vote` - the three record kinds
//! - `VotingService` - the invariant-checked operations
//! - `VotingError` - the typed failure taxonomy

mod errors;
mod model;
mod service;

pub use errors::{Subject, VotingError, VotingResult};
pub use model::{Candidate, CandidateId, Vote, VoteId, Voter, VoterId};
pub use service::{CandidateTally, VotingService};
