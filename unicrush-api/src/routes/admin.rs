use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use unicrush_core::meetings::{DecisionOutcome, VerificationOutcome};
use unicrush_core::models::{Gender, UserId};
use unicrush_core::store::{GamificationStore, ProfileStore};
use unicrush_shared::errors::AppResult;
use unicrush_shared::types::ApiResponse;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub approve: bool,
}

#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub result: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_awarded: Option<i64>,
}

/// POST /admin/meetups/:id/decision - moderator verdict on a submitted
/// meetup video.
pub async fn decide_meetup(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<DecisionRequest>,
) -> AppResult<Json<ApiResponse<DecisionResponse>>> {
    let outcome = state.matchmaker.decide_meetup(id, req.approve).await?;

    let (result, points_awarded, message) = match outcome {
        DecisionOutcome::Confirmed { points, .. } => {
            ("confirmed", Some(points), "meetup confirmed, points awarded")
        }
        DecisionOutcome::Declined => ("declined", None, "meetup declined, no points"),
        DecisionOutcome::Stale => ("stale", None, "not found or already processed"),
    };
    Ok(Json(ApiResponse::ok_with_message(
        DecisionResponse {
            result,
            points_awarded,
        },
        message,
    )))
}

/// POST /admin/verification/:user - moderator verdict on a profile
/// verification video.
pub async fn review_verification(
    State(state): State<Arc<AppState>>,
    Path(user): Path<i64>,
    Json(req): Json<DecisionRequest>,
) -> AppResult<Json<ApiResponse<DecisionResponse>>> {
    let outcome = state
        .matchmaker
        .review_verification(UserId(user), req.approve)
        .await?;

    let (result, message) = match outcome {
        VerificationOutcome::Approved => ("approved", "profile verified"),
        VerificationOutcome::AlreadyVerified => ("already_verified", "already processed"),
        VerificationOutcome::Declined => ("declined", "verification video rejected"),
        VerificationOutcome::NothingPending => ("nothing_pending", "no video to review"),
    };
    Ok(Json(ApiResponse::ok_with_message(
        DecisionResponse {
            result,
            points_awarded: None,
        },
        message,
    )))
}

/// POST /admin/points/reset - wipes the whole monthly ledger.
pub async fn reset_points(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.store.reset_points().await;
    tracing::info!("points ledger cleared");
    Ok(Json(ApiResponse::ok_with_message((), "points ledger cleared")))
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_profiles: usize,
    pub male: usize,
    pub female: usize,
    pub verified: usize,
}

/// GET /admin/stats
pub async fn stats(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<StatsResponse>>> {
    let profiles = state.store.list_profiles().await;
    let male = profiles.iter().filter(|p| p.gender == Gender::Male).count();
    let female = profiles
        .iter()
        .filter(|p| p.gender == Gender::Female)
        .count();
    let verified = profiles.iter().filter(|p| p.verified).count();
    Ok(Json(ApiResponse::ok(StatsResponse {
        total_profiles: profiles.len(),
        male,
        female,
        verified,
    })))
}
