use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Student group that sessions belong to (a "ficha" in the upstream system).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseGroup {
    pub id: i64,

    /// Group number shown to operators
    pub code: String,

    /// Name of the training program
    pub program: String,
}

/// A scheduled class meeting, immutable once fetched from the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledSession {
    pub id: i64,

    pub group: CourseGroup,

    pub date: NaiveDate,

    pub start_time: NaiveTime,

    pub end_time: NaiveTime,

    /// Minutes after start_time before a check-in counts as late
    pub tolerance_minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Institutional student number, when assigned
    pub student_id: Option<String>,
}

/// Attendance state of one student in one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

/// One row of the authoritative attendance roster. The server owns these;
/// the controller only ever caches read-only snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: i64,
    pub student: Student,
    pub status: AttendanceStatus,
    pub check_in: Option<DateTime<Utc>>,
}

/// Body of a successful recognition submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionResponse {
    pub message: String,
    #[serde(default)]
    pub recognized_count: Option<u32>,
}

/// The today-sessions endpoint is paginated server-side.
#[derive(Debug, Deserialize)]
pub(crate) struct SessionPage {
    pub results: Vec<ScheduledSession>,
}
