use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session selection
        .route(
            "/attendance/sessions/today",
            get(handlers::today_sessions),
        )
        .route("/attendance/live/select", post(handlers::select_session))
        // Live session control
        .route("/attendance/live/begin", post(handlers::begin_session))
        .route("/attendance/live/stop", post(handlers::stop_session))
        // Live session queries
        .route("/attendance/live/status", get(handlers::live_status))
        .route("/attendance/live/roster", get(handlers::live_roster))
        .route(
            "/attendance/live/roster/:entry_id",
            patch(handlers::update_roster_entry),
        )
        // The dashboard frontend runs on a separate origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
