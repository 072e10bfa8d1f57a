use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use unicrush_core::models::UserId;
use unicrush_core::store::VoteOutcome;
use unicrush_shared::errors::{AppError, AppResult, ErrorCode};
use unicrush_shared::types::ApiResponse;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub voter: i64,
    pub target: i64,
    pub score: u8,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub recorded: bool,
}

/// POST /votes - 1..=5 score for a matched partner. Repeat votes and
/// self-votes are confirmed but change nothing.
pub async fn send_vote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VoteRequest>,
) -> AppResult<Json<ApiResponse<VoteResponse>>> {
    if !(1..=5).contains(&req.score) {
        return Err(AppError::new(
            ErrorCode::InvalidScore,
            "score must be between 1 and 5",
        ));
    }

    let outcome = state
        .ratings
        .record_vote(UserId(req.voter), UserId(req.target), req.score)
        .await;

    let (recorded, message) = match outcome {
        VoteOutcome::Recorded => (true, "thanks for the vote"),
        VoteOutcome::AlreadyVoted => (false, "you already voted for this user"),
        VoteOutcome::SelfVote => (false, "you cannot vote for yourself"),
        VoteOutcome::TargetMissing => {
            return Err(AppError::new(ErrorCode::ProfileNotFound, "profile not found"))
        }
    };
    Ok(Json(ApiResponse::ok_with_message(
        VoteResponse { recorded },
        message,
    )))
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub user_id: UserId,
    pub rating: f64,
}

/// GET /ratings/:id
pub async fn get_rating(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<RatingResponse>>> {
    let user_id = UserId(id);
    let rating = state
        .ratings
        .rating_of(user_id)
        .await
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;
    Ok(Json(ApiResponse::ok(RatingResponse { user_id, rating })))
}
