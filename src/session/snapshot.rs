use super::controller::SessionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operator-visible result of the most recent recognition cycle.
/// Superseded by the next cycle; carries no independent lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionOutcome {
    pub message: String,
    pub is_error: bool,
    pub at: DateTime<Utc>,
}

impl RecognitionOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
            at: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
            at: Utc::now(),
        }
    }
}

/// Point-in-time view of the controller for status displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    pub status: SessionStatus,

    /// Selected session, if any
    pub session_id: Option<i64>,

    /// Current session epoch (bumped on every begin)
    pub epoch: u64,

    /// When the live session started
    pub started_at: Option<DateTime<Utc>>,

    /// Latest recognition outcome
    pub outcome: Option<RecognitionOutcome>,

    /// Cached roster size
    pub roster_size: usize,

    /// Recognition submissions issued this session
    pub submissions: usize,
}
