use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;

use unicrush_core::meetings::{Reaction, ReactionOutcome};
use unicrush_core::models::UserId;
use unicrush_shared::errors::AppResult;
use unicrush_shared::types::ApiResponse;

use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    Like,
    Dislike,
    Superlike,
}

#[derive(Debug, Deserialize)]
pub struct ReactionRequest {
    pub actor: i64,
    pub target: i64,
    pub kind: ReactionKind,
    /// Required for superlikes, ignored otherwise.
    pub message: Option<String>,
}

/// POST /reactions
pub async fn send_reaction(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReactionRequest>,
) -> AppResult<Json<ApiResponse<ReactionOutcome>>> {
    let reaction = match req.kind {
        ReactionKind::Like => Reaction::Like,
        ReactionKind::Dislike => Reaction::Dislike,
        ReactionKind::Superlike => Reaction::Superlike {
            message: req.message.unwrap_or_default(),
        },
    };

    let outcome = state
        .matchmaker
        .react(UserId(req.actor), UserId(req.target), reaction)
        .await?;

    if outcome.matched {
        Ok(Json(ApiResponse::ok_with_message(outcome, "it's a match")))
    } else {
        Ok(Json(ApiResponse::ok(outcome)))
    }
}
