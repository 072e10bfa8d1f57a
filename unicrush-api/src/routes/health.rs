use axum::Json;

use unicrush_shared::types::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        "unicrush-api",
        env!("CARGO_PKG_VERSION"),
    ))
}
