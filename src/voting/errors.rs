//! # Voting Errors
//!
//! Typed failure taxonomy for the voting domain service.
//!
//! Domain-rule violations (`NotFound`, `AlreadyVoted`) carry enough context
//! to describe the rejection. `Persistence` is deliberately generic: the
//! storage detail is logged at the point of failure and never reaches the
//! caller.

use std::fmt;

use thiserror::Error;

use super::model::{CandidateId, VoterId};

/// Result type for voting operations
pub type VotingResult<T> = Result<T, VotingError>;

/// Error code for a failed voter registration write.
pub const VOTER_ADD_FAILURE: &str = "VOTER_ADD_FAILURE";
/// Error code for a failed candidate registration write.
pub const CANDIDATE_ADD_FAILURE: &str = "CANDIDATE_ADD_FAILURE";
/// Error code for a failed cast-vote commit.
pub const VOTING_FAILURE: &str = "VOTING_FAILURE";

/// Subject of a failed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Voter,
    Candidate,
}

impl Subject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Voter => "voter",
            Subject::Candidate => "candidate",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Voting domain and persistence errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VotingError {
    /// Referenced voter or candidate id does not resolve
    #[error("{subject} of id '{id}' not found")]
    NotFound { subject: Subject, id: u64 },

    /// Voter has already cast a vote; a second cast is rejected, not repeated
    #[error("voter of id '{voter}' has already voted")]
    AlreadyVoted { voter: VoterId },

    /// The storage layer could not complete a durable write
    #[error("unexpected error occurred")]
    Persistence { code: &'static str },
}

impl VotingError {
    /// Not-found rejection for a missing voter.
    pub fn voter_not_found(id: VoterId) -> Self {
        VotingError::NotFound {
            subject: Subject::Voter,
            id: id.value(),
        }
    }

    /// Not-found rejection for a missing candidate.
    pub fn candidate_not_found(id: CandidateId) -> Self {
        VotingError::NotFound {
            subject: Subject::Candidate,
            id: id.value(),
        }
    }

    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 404 Not Found
            VotingError::NotFound { .. } => 404,

            // 409 Conflict - domain rejection and infrastructure failure
            // are both surfaced as conflicts, never retried by the core
            VotingError::AlreadyVoted { .. } => 409,
            VotingError::Persistence { .. } => 409,
        }
    }

    /// Returns the stable string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            VotingError::NotFound { .. } => "NOT_FOUND",
            VotingError::AlreadyVoted { .. } => "ALREADY_VOTED",
            VotingError::Persistence { code } => code,
        }
    }

    /// Returns whether this error is a domain-rule rejection rather than
    /// an infrastructure failure
    pub fn is_domain_rejection(&self) -> bool {
        !matches!(self, VotingError::Persistence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            VotingError::voter_not_found(VoterId::new(99)).status_code(),
            404
        );
        assert_eq!(
            VotingError::AlreadyVoted {
                voter: VoterId::new(1)
            }
            .status_code(),
            409
        );
        assert_eq!(
            VotingError::Persistence {
                code: VOTING_FAILURE
            }
            .status_code(),
            409
        );
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(
            VotingError::candidate_not_found(CandidateId::new(2)).code(),
            "NOT_FOUND"
        );
        assert_eq!(
            VotingError::Persistence {
                code: VOTER_ADD_FAILURE
            }
            .code(),
            "VOTER_ADD_FAILURE"
        );
    }

    #[test]
    fn test_not_found_names_the_subject() {
        let err = VotingError::voter_not_found(VoterId::new(99));
        assert_eq!(err.to_string(), "voter of id '99' not found");

        let err = VotingError::candidate_not_found(CandidateId::new(42));
        assert_eq!(err.to_string(), "candidate of id '42' not found");
    }

    #[test]
    fn test_rejections_are_distinguished_from_infrastructure_failures() {
        assert!(VotingError::voter_not_found(VoterId::new(1)).is_domain_rejection());
        assert!(VotingError::AlreadyVoted {
            voter: VoterId::new(1)
        }
        .is_domain_rejection());
        assert!(!VotingError::Persistence {
            code: VOTING_FAILURE
        }
        .is_domain_rejection());
    }

    #[test]
    fn test_persistence_message_does_not_leak_storage_detail() {
        let err = VotingError::Persistence {
            code: VOTING_FAILURE,
        };
        let display = err.to_string();
        assert!(!display.contains("journal"));
        assert!(!display.contains("fsync"));
        assert!(!display.contains("io"));
    }
}
