use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use unicrush_core::gamification;
use unicrush_core::models::UserId;
use unicrush_core::store::{GamificationStore, ProfileStore};
use unicrush_shared::errors::{AppError, AppResult};
use unicrush_shared::types::ApiResponse;

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    /// "YYYY-MM"; defaults to the current month.
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub name: String,
    pub points: i64,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub month: String,
    pub entries: Vec<LeaderboardEntry>,
}

/// GET /leaderboard?month=YYYY-MM - monthly points ranking, highest first.
pub async fn monthly_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardParams>,
) -> AppResult<Json<ApiResponse<LeaderboardResponse>>> {
    let month = match params.month {
        Some(month) => {
            NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
                .map_err(|_| AppError::bad_request("month must look like 2026-03"))?;
            month
        }
        None => gamification::current_month_key(),
    };

    let rows = state.store.leaderboard(&month).await;
    let mut entries = Vec::with_capacity(rows.len());
    for (user_id, points) in rows {
        let name = state
            .store
            .get_profile(user_id)
            .await
            .map(|p| p.name)
            .unwrap_or_else(|| "unknown".into());
        entries.push(LeaderboardEntry {
            user_id,
            name,
            points,
        });
    }

    Ok(Json(ApiResponse::ok(LeaderboardResponse { month, entries })))
}
