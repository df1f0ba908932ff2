use crate::api::AttendanceApi;
use crate::session::SessionController;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The one live-session controller for this service
    pub controller: Arc<SessionController>,

    /// Data API client, used directly for read-through queries
    pub api: Arc<dyn AttendanceApi>,
}

impl AppState {
    pub fn new(controller: Arc<SessionController>, api: Arc<dyn AttendanceApi>) -> Self {
        Self { controller, api }
    }
}
