// Shared mock capabilities for controller and HTTP tests.
#![allow(dead_code)]

use aula_live::{
    ApiError, AttendanceApi, AttendanceStatus, CaptureConstraints, CourseGroup, FaceDetector,
    FaceRegion, MediaError, MediaSource, OverlaySink, RecognitionResponse, RosterEntry,
    ScheduledSession, SessionConfig, SessionController, Student, VideoFrame,
};
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Fixtures
// ============================================================================

pub fn scheduled(id: i64) -> ScheduledSession {
    ScheduledSession {
        id,
        group: CourseGroup {
            id: 100 + id,
            code: format!("28325{id}"),
            program: "Software Development".to_string(),
        },
        date: NaiveDate::from_ymd_opt(2026, 8, 25).unwrap(),
        start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        tolerance_minutes: 15,
    }
}

pub fn entry(entry_id: i64, student_id: i64, status: AttendanceStatus) -> RosterEntry {
    RosterEntry {
        id: entry_id,
        student: Student {
            id: student_id,
            first_name: format!("Student{student_id}"),
            last_name: "Test".to_string(),
            student_id: Some(format!("S-{student_id}")),
        },
        status,
        check_in: None,
    }
}

// ============================================================================
// Mock data API
// ============================================================================

pub struct MockApi {
    pub sessions: Mutex<Vec<ScheduledSession>>,
    /// Roster served per session id; mutated by update_attendance
    pub rosters: Mutex<HashMap<i64, Vec<RosterEntry>>>,
    pub recognize_delay: Mutex<Duration>,
    pub roster_delay: Mutex<Duration>,
    pub fail_update: AtomicBool,
    /// Session ids of recognition submissions, in order
    pub recognize_calls: Mutex<Vec<i64>>,
    /// Session ids of roster fetches, in order
    pub roster_calls: Mutex<Vec<i64>>,
    pub update_calls: Mutex<Vec<(i64, AttendanceStatus)>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(vec![scheduled(1), scheduled(2)]),
            rosters: Mutex::new(HashMap::new()),
            recognize_delay: Mutex::new(Duration::ZERO),
            roster_delay: Mutex::new(Duration::ZERO),
            fail_update: AtomicBool::new(false),
            recognize_calls: Mutex::new(Vec::new()),
            roster_calls: Mutex::new(Vec::new()),
            update_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_roster(&self, session_id: i64, entries: Vec<RosterEntry>) {
        self.rosters.lock().unwrap().insert(session_id, entries);
    }

    pub fn set_recognize_delay(&self, delay: Duration) {
        *self.recognize_delay.lock().unwrap() = delay;
    }

    pub fn set_roster_delay(&self, delay: Duration) {
        *self.roster_delay.lock().unwrap() = delay;
    }

    pub fn recognize_count(&self) -> usize {
        self.recognize_calls.lock().unwrap().len()
    }

    pub fn roster_fetch_count(&self) -> usize {
        self.roster_calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl AttendanceApi for MockApi {
    async fn today_sessions(&self) -> Result<Vec<ScheduledSession>, ApiError> {
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn recognize(
        &self,
        session_id: i64,
        _jpeg: Vec<u8>,
    ) -> Result<RecognitionResponse, ApiError> {
        self.recognize_calls.lock().unwrap().push(session_id);
        let delay = *self.recognize_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(RecognitionResponse {
            message: format!("session {session_id} processed"),
            recognized_count: Some(1),
        })
    }

    async fn attendance_log(&self, session_id: i64) -> Result<Vec<RosterEntry>, ApiError> {
        self.roster_calls.lock().unwrap().push(session_id);
        let delay = *self.roster_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(self
            .rosters
            .lock()
            .unwrap()
            .get(&session_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_attendance(
        &self,
        entry_id: i64,
        status: AttendanceStatus,
    ) -> Result<RosterEntry, ApiError> {
        self.update_calls.lock().unwrap().push((entry_id, status));
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(ApiError::Service("update rejected".to_string()));
        }

        let mut rosters = self.rosters.lock().unwrap();
        for entries in rosters.values_mut() {
            if let Some(entry) = entries.iter_mut().find(|e| e.id == entry_id) {
                entry.status = status;
                return Ok(entry.clone());
            }
        }
        Err(ApiError::Service(format!("entry {entry_id} not found")))
    }
}

// ============================================================================
// Mock camera
// ============================================================================

pub struct MockMedia {
    acquired: AtomicBool,
    pub fail_acquire: AtomicBool,
    pub acquire_count: AtomicUsize,
    pub release_count: AtomicUsize,
}

impl MockMedia {
    pub fn new() -> Self {
        Self {
            acquired: AtomicBool::new(false),
            fail_acquire: AtomicBool::new(false),
            acquire_count: AtomicUsize::new(0),
            release_count: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        let media = Self::new();
        media.fail_acquire.store(true, Ordering::SeqCst);
        media
    }
}

#[async_trait::async_trait]
impl MediaSource for MockMedia {
    async fn acquire(&self, _constraints: &CaptureConstraints) -> Result<(), MediaError> {
        if self.fail_acquire.load(Ordering::SeqCst) {
            return Err(MediaError::HardwareUnavailable("no device".to_string()));
        }
        if self.acquired.swap(true, Ordering::SeqCst) {
            return Err(MediaError::AlreadyAcquired);
        }
        self.acquire_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn current_frame(&self) -> Option<VideoFrame> {
        if !self.acquired.load(Ordering::SeqCst) {
            return None;
        }
        Some(VideoFrame {
            pixels: vec![64u8; 4 * 4 * 3],
            width: 4,
            height: 4,
            timestamp_ms: 0,
        })
    }

    async fn release(&self) {
        if self.acquired.swap(false, Ordering::SeqCst) {
            self.release_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_acquired(&self) -> bool {
        self.acquired.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Mock detector and overlay sink
// ============================================================================

pub struct MockDetector {
    pub calls: AtomicUsize,
}

impl MockDetector {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl FaceDetector for MockDetector {
    fn name(&self) -> &str {
        "mock"
    }

    fn detect_faces(&self, _frame: &VideoFrame) -> anyhow::Result<Vec<FaceRegion>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![FaceRegion {
            x: 1.0,
            y: 1.0,
            width: 2.0,
            height: 2.0,
        }])
    }
}

pub struct MockSink {
    pub draws: AtomicUsize,
    pub clears: AtomicUsize,
}

impl MockSink {
    pub fn new() -> Self {
        Self {
            draws: AtomicUsize::new(0),
            clears: AtomicUsize::new(0),
        }
    }
}

impl OverlaySink for MockSink {
    fn display_size(&self) -> (u32, u32) {
        (640, 360)
    }

    fn draw(&self, _regions: &[FaceRegion]) {
        self.draws.fetch_add(1, Ordering::SeqCst);
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub api: Arc<MockApi>,
    pub media: Arc<MockMedia>,
    pub detector: Arc<MockDetector>,
    pub sink: Arc<MockSink>,
    pub controller: Arc<SessionController>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self::build(config, Arc::new(MockMedia::new()))
    }

    pub fn with_failing_camera() -> Self {
        Self::build(SessionConfig::default(), Arc::new(MockMedia::failing()))
    }

    fn build(config: SessionConfig, media: Arc<MockMedia>) -> Self {
        let api = Arc::new(MockApi::new());
        let detector = Arc::new(MockDetector::new());
        let sink = Arc::new(MockSink::new());
        let controller = Arc::new(SessionController::new(
            config,
            api.clone(),
            media.clone(),
            detector.clone(),
            sink.clone(),
        ));
        Self {
            api,
            media,
            detector,
            sink,
            controller,
        }
    }
}
