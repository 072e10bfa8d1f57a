use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

use unicrush_core::models::{Profile, ProfileInput, UserId};
use unicrush_core::rating;
use unicrush_core::store::ProfileStore;
use unicrush_shared::errors::{AppError, AppResult, ErrorCode};
use unicrush_shared::types::ApiResponse;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub rating: f64,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let rating = rating::displayed_rating(&profile);
        Self { profile, rating }
    }
}

/// PUT /profiles - validated create-or-replace. Edits keep the rating
/// accumulators and verification state; the browse session is dropped so a
/// changed filter takes effect on the next card.
pub async fn upsert_profile(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ProfileInput>,
) -> AppResult<Json<ApiResponse<ProfileResponse>>> {
    input.validate().map_err(|e| {
        AppError::with_details(
            ErrorCode::ValidationError,
            "invalid profile",
            serde_json::to_value(&e).unwrap_or(serde_json::Value::Null),
        )
    })?;

    let user_id = input.user_id;
    let existing = state.store.get_profile(user_id).await;
    let profile = input.into_profile(existing.as_ref());
    state.store.upsert_profile(profile.clone()).await;
    state.selector.reset(user_id);

    tracing::info!(user_id = %user_id, "profile saved");
    Ok(Json(ApiResponse::ok(profile.into())))
}

/// GET /profiles/:id
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ProfileResponse>>> {
    let profile = state
        .store
        .get_profile(UserId(id))
        .await
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;
    Ok(Json(ApiResponse::ok(profile.into())))
}

/// DELETE /profiles/:id - cascades to interactions, votes, meetups, points,
/// badges, and streaks.
pub async fn delete_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    let user_id = UserId(id);
    if !state.store.delete_profile(user_id).await {
        return Err(AppError::new(ErrorCode::ProfileNotFound, "profile not found"));
    }
    state.selector.reset(user_id);

    tracing::info!(user_id = %user_id, "profile deleted");
    Ok(Json(ApiResponse::ok_with_message((), "profile deleted")))
}
