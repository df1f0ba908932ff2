pub mod api;
pub mod config;
pub mod detect;
pub mod http;
pub mod media;
pub mod overlay;
pub mod session;

pub use api::{
    ApiError, AttendanceApi, AttendanceStatus, CourseGroup, HttpAttendanceApi,
    RecognitionResponse, RosterEntry, ScheduledSession, Student,
};
pub use config::Config;
pub use detect::{FaceDetector, FaceRegion, StubDetector};
pub use http::{create_router, AppState};
pub use media::{
    CaptureConstraints, MediaError, MediaKind, MediaSource, MediaSourceFactory, TestPatternSource,
    VideoFrame,
};
pub use overlay::{scale_to_display, OverlaySink, TraceOverlaySink};
pub use session::{
    ControllerError, ControllerSnapshot, RecognitionOutcome, SessionConfig, SessionController,
    SessionStatus,
};
