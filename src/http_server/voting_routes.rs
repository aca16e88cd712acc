//! Voting HTTP Routes
//!
//! Endpoints for voter and candidate registration, listings, and the
//! cast-vote transaction. Shape validation happens here, before the
//! domain service is invoked; domain errors map to responses via their
//! own status codes.
//!
//! Wire format is camelCase JSON. Validation failures return a 400 with a
//! JSON array of `{field, message, code}`; domain and infrastructure
//! failures return an `{error, code}` object.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::voting::{CandidateId, VoterId, VotingError, VotingService};

/// Error code for a missing or empty required field.
const REQUIRED: &str = "REQUIRED";

// ==================
// Shared State
// ==================

/// Voting state shared across handlers
pub struct VotingState {
    pub service: Arc<VotingService>,
}

impl VotingState {
    pub fn new(service: Arc<VotingService>) -> Self {
        Self { service }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoterResponse {
    pub id: u64,
    pub name: String,
    pub has_voted: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResponse {
    pub id: u64,
    pub name: String,
    pub votes: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateCreatedResponse {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddVoterRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCandidateRequest {
    #[serde(default)]
    pub name: String,
}

/// Missing ids deserialize to 0 and are rejected by validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVoteRequest {
    #[serde(default)]
    pub voter_id: u64,
    #[serde(default)]
    pub candidate_id: u64,
}

/// One field-level validation failure
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
    pub code: &'static str,
}

impl FieldError {
    fn required(field: &'static str) -> Self {
        Self {
            field,
            message: format!("{} is required", field),
            code: REQUIRED,
        }
    }
}

// ==================
// Voting Routes
// ==================

/// Create voting routes
pub fn voting_routes(state: Arc<VotingState>) -> Router {
    Router::new()
        .route("/voters", get(get_voters_handler))
        .route("/voter", post(add_voter_handler))
        .route("/candidates", get(get_candidates_handler))
        .route("/candidate", post(add_candidate_handler))
        .route("/cast-vote", post(cast_vote_handler))
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

type ErrorReply = (StatusCode, Json<Value>);

/// 400 carrying the offending fields, in the shape `[{field, message, code}]`
fn validation_reply(errors: Vec<FieldError>) -> ErrorReply {
    (StatusCode::BAD_REQUEST, Json(json!(errors)))
}

/// Domain or infrastructure error as `{error, code}`.
///
/// `Persistence` displays as a generic message, so storage internals never
/// reach the wire.
fn domain_reply(err: VotingError) -> ErrorReply {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": err.to_string(),
            "code": err.code(),
        })),
    )
}

// ==================
// Voter Handlers
// ==================

async fn get_voters_handler(
    State(state): State<Arc<VotingState>>,
) -> Result<Json<Vec<VoterResponse>>, ErrorReply> {
    let voters = state.service.list_voters().map_err(domain_reply)?;

    Ok(Json(
        voters
            .into_iter()
            .map(|v| VoterResponse {
                id: v.id.value(),
                name: v.name,
                has_voted: v.has_voted,
            })
            .collect(),
    ))
}

async fn add_voter_handler(
    State(state): State<Arc<VotingState>>,
    Json(request): Json<AddVoterRequest>,
) -> Result<Json<VoterResponse>, ErrorReply> {
    if request.name.trim().is_empty() {
        return Err(validation_reply(vec![FieldError::required("name")]));
    }

    let voter = state
        .service
        .register_voter(&request.name)
        .map_err(domain_reply)?;

    Ok(Json(VoterResponse {
        id: voter.id.value(),
        name: voter.name,
        has_voted: voter.has_voted,
    }))
}

// ==================
// Candidate Handlers
// ==================

async fn get_candidates_handler(
    State(state): State<Arc<VotingState>>,
) -> Result<Json<Vec<CandidateResponse>>, ErrorReply> {
    let tallies = state.service.list_candidates().map_err(domain_reply)?;

    Ok(Json(
        tallies
            .into_iter()
            .map(|t| CandidateResponse {
                id: t.id.value(),
                name: t.name,
                votes: t.votes,
            })
            .collect(),
    ))
}

async fn add_candidate_handler(
    State(state): State<Arc<VotingState>>,
    Json(request): Json<AddCandidateRequest>,
) -> Result<Json<CandidateCreatedResponse>, ErrorReply> {
    if request.name.trim().is_empty() {
        return Err(validation_reply(vec![FieldError::required("name")]));
    }

    let candidate = state
        .service
        .register_candidate(&request.name)
        .map_err(domain_reply)?;

    Ok(Json(CandidateCreatedResponse {
        id: candidate.id.value(),
        name: candidate.name,
    }))
}

// ==================
// Cast-Vote Handler
// ==================

async fn cast_vote_handler(
    State(state): State<Arc<VotingState>>,
    Json(request): Json<CastVoteRequest>,
) -> Result<StatusCode, ErrorReply> {
    let mut errors = Vec::new();
    if request.voter_id == 0 {
        errors.push(FieldError::required("voterId"));
    }
    if request.candidate_id == 0 {
        errors.push(FieldError::required("candidateId"));
    }
    if !errors.is_empty() {
        return Err(validation_reply(errors));
    }

    state
        .service
        .cast_vote(
            VoterId::new(request.voter_id),
            CandidateId::new(request.candidate_id),
        )
        .map_err(domain_reply)?;

    Ok(StatusCode::OK)
}
