use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod routes;

use config::AppConfig;
use unicrush_core::matching::CandidateSelector;
use unicrush_core::meetings::Matchmaker;
use unicrush_core::models::UserId;
use unicrush_core::notifier::{LoggingNotifier, Notifier};
use unicrush_core::rating::RatingEngine;
use unicrush_core::store::{InMemoryStore, Repository};

pub struct AppState {
    pub store: Arc<dyn Repository>,
    pub selector: CandidateSelector,
    pub matchmaker: Matchmaker,
    pub ratings: RatingEngine,
    pub config: AppConfig,
}

pub fn build_state(config: AppConfig) -> Arc<AppState> {
    let store: Arc<dyn Repository> = Arc::new(InMemoryStore::new());
    let notifier: Arc<dyn Notifier> = Arc::new(LoggingNotifier);
    build_state_with(config, store, notifier)
}

/// Wiring seam used by the binary and by tests that want to watch the
/// outbound traffic.
pub fn build_state_with(
    config: AppConfig,
    store: Arc<dyn Repository>,
    notifier: Arc<dyn Notifier>,
) -> Arc<AppState> {
    let moderator = config.moderator_id.map(UserId);
    Arc::new(AppState {
        selector: CandidateSelector::new(store.clone()),
        matchmaker: Matchmaker::new(store.clone(), notifier, moderator),
        ratings: RatingEngine::new(store.clone()),
        store,
        config,
    })
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(routes::health::health_check))
        // Profiles
        .route("/profiles", put(routes::profiles::upsert_profile))
        .route(
            "/profiles/:id",
            get(routes::profiles::get_profile).delete(routes::profiles::delete_profile),
        )
        // Browsing
        .route("/browse/next/:viewer", get(routes::browse::next_candidate))
        .route("/browse/roulette/:viewer", get(routes::browse::roulette))
        // Reactions and ratings
        .route("/reactions", post(routes::reactions::send_reaction))
        .route("/votes", post(routes::votes::send_vote))
        .route("/ratings/:id", get(routes::votes::get_rating))
        // Meetups
        .route("/meetups/:id/respond", post(routes::meetups::respond))
        .route("/meetups/video", post(routes::meetups::submit_video))
        .route("/meetups/active/:user", get(routes::meetups::active_task))
        // Gamification
        .route(
            "/leaderboard",
            get(routes::leaderboard::monthly_leaderboard),
        )
        // Moderator back-office
        .route(
            "/admin/meetups/:id/decision",
            post(routes::admin::decide_meetup),
        )
        .route(
            "/admin/verification/:user",
            post(routes::admin::review_verification),
        )
        .route("/admin/points/reset", post(routes::admin::reset_points))
        .route("/admin/stats", get(routes::admin::stats))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
