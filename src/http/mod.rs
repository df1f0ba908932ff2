//! HTTP control surface for the dashboard frontend
//!
//! This module exposes the live-session controller over REST:
//! - GET  /attendance/sessions/today - Operator's scheduled sessions
//! - POST /attendance/live/select - Choose a session to run
//! - POST /attendance/live/begin - Acquire the camera and go live
//! - POST /attendance/live/stop - Tear the live session down
//! - GET  /attendance/live/status - Controller snapshot
//! - GET  /attendance/live/roster - Cached attendance roster
//! - PATCH /attendance/live/roster/:entry_id - Manual correction
//! - GET  /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
