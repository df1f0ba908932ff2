use super::state::AppState;
use crate::api::AttendanceStatus;
use crate::session::ControllerError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SelectSessionRequest {
    /// Id of one of today's scheduled sessions
    pub session_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntryRequest {
    pub status: AttendanceStatus,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn controller_error_response(e: ControllerError) -> axum::response::Response {
    let status = match &e {
        ControllerError::Hardware(_) => StatusCode::SERVICE_UNAVAILABLE,
        ControllerError::Api(_) => StatusCode::BAD_GATEWAY,
        ControllerError::NoSessionSelected
        | ControllerError::NotIdle
        | ControllerError::NotLive => StatusCode::CONFLICT,
    };
    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /attendance/sessions/today
/// The operator's scheduled sessions for today
pub async fn today_sessions(State(state): State<AppState>) -> impl IntoResponse {
    match state.api.today_sessions().await {
        Ok(sessions) => (StatusCode::OK, Json(sessions)).into_response(),
        Err(e) => {
            error!("failed to fetch today's sessions: {e}");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// POST /attendance/live/select
/// Choose which of today's sessions to run
pub async fn select_session(
    State(state): State<AppState>,
    Json(req): Json<SelectSessionRequest>,
) -> impl IntoResponse {
    let sessions = match state.api.today_sessions().await {
        Ok(sessions) => sessions,
        Err(e) => {
            error!("failed to fetch today's sessions: {e}");
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    let Some(scheduled) = sessions.into_iter().find(|s| s.id == req.session_id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("session {} is not scheduled for today", req.session_id),
            }),
        )
            .into_response();
    };

    match state.controller.select_session(scheduled).await {
        Ok(()) => (StatusCode::OK, Json(state.controller.snapshot().await)).into_response(),
        Err(e) => controller_error_response(e),
    }
}

/// POST /attendance/live/begin
/// Acquire the camera and start the live session
pub async fn begin_session(State(state): State<AppState>) -> impl IntoResponse {
    match state.controller.begin().await {
        Ok(()) => {
            info!("live session begin accepted");
            (StatusCode::OK, Json(state.controller.snapshot().await)).into_response()
        }
        Err(e) => {
            error!("failed to begin live session: {e}");
            controller_error_response(e)
        }
    }
}

/// POST /attendance/live/stop
/// Stop the live session; idempotent
pub async fn stop_session(State(state): State<AppState>) -> impl IntoResponse {
    state.controller.stop().await;
    (StatusCode::OK, Json(state.controller.snapshot().await)).into_response()
}

/// GET /attendance/live/status
/// Controller snapshot for the status display
pub async fn live_status(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.controller.snapshot().await)).into_response()
}

/// GET /attendance/live/roster
/// Cached attendance roster for the live session
pub async fn live_roster(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.controller.roster().await)).into_response()
}

/// PATCH /attendance/live/roster/:entry_id
/// Manually correct one roster entry
pub async fn update_roster_entry(
    State(state): State<AppState>,
    Path(entry_id): Path<i64>,
    Json(req): Json<UpdateEntryRequest>,
) -> impl IntoResponse {
    match state.controller.review(entry_id, req.status).await {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(e) => {
            error!(entry_id, "manual attendance update failed: {e}");
            controller_error_response(e)
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
