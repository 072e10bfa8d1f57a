use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use unicrush_core::models::UserId;
use unicrush_core::store::GamificationStore;
use unicrush_shared::errors::AppResult;
use unicrush_shared::types::ApiResponse;

use super::profiles::ProfileResponse;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CandidateResponse {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    /// Set when the card comes from the already-liked fallback pool.
    pub is_revisit: bool,
}

/// GET /browse/next/:viewer - the next card for the viewer. Browsing counts
/// as daily activity for the streak.
pub async fn next_candidate(
    State(state): State<Arc<AppState>>,
    Path(viewer): Path<i64>,
) -> AppResult<Json<ApiResponse<Option<CandidateResponse>>>> {
    let viewer = UserId(viewer);
    let pick = state.selector.next_candidate(viewer).await?;

    state
        .store
        .touch_streak(viewer, Utc::now().date_naive())
        .await;

    match pick {
        Some(pick) => Ok(Json(ApiResponse::ok(Some(CandidateResponse {
            profile: pick.profile.into(),
            is_revisit: pick.is_revisit,
        })))),
        None => Ok(Json(ApiResponse::ok_with_message(
            None,
            "no more profiles matching your filter, try again later",
        ))),
    }
}

/// GET /browse/roulette/:viewer - one random eligible profile, history
/// ignored.
pub async fn roulette(
    State(state): State<Arc<AppState>>,
    Path(viewer): Path<i64>,
) -> AppResult<Json<ApiResponse<Option<ProfileResponse>>>> {
    let profile = state.selector.roulette(UserId(viewer)).await?;
    match profile {
        Some(profile) => Ok(Json(ApiResponse::ok(Some(profile.into())))),
        None => Ok(Json(ApiResponse::ok_with_message(
            None,
            "nobody to match with right now",
        ))),
    }
}
