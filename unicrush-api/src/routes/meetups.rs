use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use unicrush_core::meetings::VideoOutcome;
use unicrush_core::models::{MeetupTask, UserId};
use unicrush_core::store::AgreementOutcome;
use unicrush_shared::errors::AppResult;
use unicrush_shared::types::ApiResponse;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub user: i64,
    pub agree: bool,
}

#[derive(Debug, Serialize)]
pub struct RespondResponse {
    pub result: &'static str,
}

/// POST /meetups/:id/respond - go/decline answer to a pending proposal.
pub async fn respond(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<RespondRequest>,
) -> AppResult<Json<ApiResponse<RespondResponse>>> {
    let outcome = state
        .matchmaker
        .respond_to_meetup(id, UserId(req.user), req.agree)
        .await?;

    let (result, message) = match outcome {
        AgreementOutcome::Agreed => ("agreed", "you're in, waiting for your match to answer"),
        AgreementOutcome::BothAgreed => ("both_agreed", "you're both in"),
        AgreementOutcome::Declined => ("declined", "the meetup is cancelled"),
        AgreementOutcome::Stale => ("stale", "not found or already processed"),
    };
    Ok(Json(ApiResponse::ok_with_message(
        RespondResponse { result },
        message,
    )))
}

#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    pub user: i64,
    pub video: String,
}

/// POST /meetups/video - proof-of-meetup clip from the initiator.
pub async fn submit_video(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VideoRequest>,
) -> AppResult<Json<ApiResponse<RespondResponse>>> {
    let outcome = state
        .matchmaker
        .submit_meetup_video(UserId(req.user), req.video)
        .await?;

    let (result, message) = match outcome {
        VideoOutcome::Submitted => (
            "submitted",
            "video sent for review, a moderator will confirm it",
        ),
        VideoOutcome::NotInitiator => (
            "not_initiator",
            "your match is the one who has to send the video",
        ),
        VideoOutcome::NothingPending => ("nothing_pending", "you have no meetup waiting for a video"),
    };
    Ok(Json(ApiResponse::ok_with_message(
        RespondResponse { result },
        message,
    )))
}

/// GET /meetups/active/:user - the user's current meetup; expired ones are
/// invisible.
pub async fn active_task(
    State(state): State<Arc<AppState>>,
    Path(user): Path<i64>,
) -> AppResult<Json<ApiResponse<Option<MeetupTask>>>> {
    match state.matchmaker.active_meetup_for(UserId(user)).await {
        Some(task) => Ok(Json(ApiResponse::ok(Some(task)))),
        None => Ok(Json(ApiResponse::ok_with_message(
            None,
            "nothing pending",
        ))),
    }
}
