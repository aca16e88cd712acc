//! Data model for the voting domain
//!
//! Identities are opaque `u64` newtypes assigned sequentially by the store,
//! starting at 1. A value of 0 never identifies a committed record.
//!
//! A `Vote` carries no reference to the voter who cast it. Voter-side
//! accounting lives solely in `Voter::has_voted`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a registered voter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VoterId(u64);

/// Identity of a registered candidate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CandidateId(u64);

/// Identity of a committed vote record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VoteId(u64);

macro_rules! impl_id {
    ($name:ident) => {
        impl $name {
            /// Create an identity from its raw value.
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Raw identity value.
            pub const fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

impl_id!(VoterId);
impl_id!(CandidateId);
impl_id!(VoteId);

/// A registered voter.
///
/// `has_voted` starts false and flips to true exactly once, via the
/// cast-vote transaction. There is no reverse transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub id: VoterId,
    pub name: String,
    pub has_voted: bool,
}

impl Voter {
    /// Create a voter that has not voted yet.
    pub fn new(id: VoterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            has_voted: false,
        }
    }

    /// The only legal flag transition: NotVoted -> Voted.
    pub fn mark_voted(&mut self) {
        self.has_voted = true;
    }
}

/// A registered candidate. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
}

impl Candidate {
    pub fn new(id: CandidateId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// An anonymous record of support for one candidate.
///
/// Deliberately carries no voter reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub candidate_id: CandidateId,
}

impl Vote {
    pub fn new(id: VoteId, candidate_id: CandidateId) -> Self {
        Self { id, candidate_id }
    }
}
