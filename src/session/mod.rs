//! Live attendance-capture session management
//!
//! This module provides the `SessionController` abstraction that manages:
//! - Camera acquisition and release across start/stop
//! - The detection-overlay, recognition-submission, and roster-sync tasks
//! - Epoch tagging so stale responses from a stopped session are discarded
//! - Manual correction of roster entries

mod config;
mod controller;
mod roster;
mod snapshot;

pub use config::SessionConfig;
pub use controller::{ControllerError, SessionController, SessionStatus};
pub use roster::RosterCache;
pub use snapshot::{ControllerSnapshot, RecognitionOutcome};
