pub mod client;
pub mod types;

pub use client::{ApiError, AttendanceApi, HttpAttendanceApi};
pub use types::{
    AttendanceStatus, CourseGroup, RecognitionResponse, RosterEntry, ScheduledSession, Student,
};
