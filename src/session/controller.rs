use super::config::SessionConfig;
use super::roster::RosterCache;
use super::snapshot::{ControllerSnapshot, RecognitionOutcome};
use crate::api::{ApiError, AttendanceApi, AttendanceStatus, RosterEntry, ScheduledSession};
use crate::detect::FaceDetector;
use crate::media::{MediaError, MediaSource};
use crate::overlay::{scale_to_display, OverlaySink};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Controller state. `Stopping` is internal to `stop()` and never
/// observable once it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Acquiring,
    Live,
    Stopping,
}

impl SessionStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => SessionStatus::Acquiring,
            2 => SessionStatus::Live,
            3 => SessionStatus::Stopping,
            _ => SessionStatus::Idle,
        }
    }
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("no session selected")]
    NoSessionSelected,

    #[error("a session is already selected or running")]
    NotIdle,

    #[error("no live session")]
    NotLive,

    #[error(transparent)]
    Hardware(#[from] MediaError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Handed to every task and every in-flight call: the epoch it was spawned
/// under plus the controller's live status/epoch cells. A result is only
/// applied while the controller is Live *and* still on the same epoch, so
/// responses from a stopped session die here instead of corrupting state.
#[derive(Clone)]
struct EpochGate {
    tag: u64,
    status: Arc<AtomicU8>,
    epoch: Arc<AtomicU64>,
}

impl EpochGate {
    fn is_current(&self) -> bool {
        self.status.load(Ordering::SeqCst) == SessionStatus::Live as u8
            && self.epoch.load(Ordering::SeqCst) == self.tag
    }
}

/// State only touched inside the begin/stop critical sections.
#[derive(Default)]
struct Transitions {
    selected: Option<ScheduledSession>,
    tasks: Vec<JoinHandle<()>>,
    refresh_tx: Option<mpsc::Sender<()>>,
}

/// Orchestrator for one live attendance-capture session.
///
/// Owns the camera handle and the lifetimes of the three periodic tasks
/// (detection overlay, recognition submitter, roster sync). All capability
/// dependencies are injected traits, so the controller is testable without
/// hardware, a detection model, or a running backend.
pub struct SessionController {
    config: SessionConfig,
    api: Arc<dyn AttendanceApi>,
    media: Arc<dyn MediaSource>,
    detector: Arc<dyn FaceDetector>,
    overlay: Arc<dyn OverlaySink>,

    /// Current status, readable without taking the transition lock
    status: Arc<AtomicU8>,

    /// Bumped on every begin; the discriminator for stale responses
    epoch: Arc<AtomicU64>,

    /// Sequence number handed to each roster refresh when it is issued
    fetch_seq: Arc<AtomicU64>,

    /// Recognition submissions issued this session
    submissions: Arc<AtomicUsize>,

    roster: Arc<RwLock<RosterCache>>,
    outcome: Arc<RwLock<Option<RecognitionOutcome>>>,
    started_at: Arc<RwLock<Option<DateTime<Utc>>>>,

    /// Serializes begin/stop so overlapping operator actions cannot
    /// interleave acquisition and release
    transitions: Mutex<Transitions>,
}

impl SessionController {
    pub fn new(
        config: SessionConfig,
        api: Arc<dyn AttendanceApi>,
        media: Arc<dyn MediaSource>,
        detector: Arc<dyn FaceDetector>,
        overlay: Arc<dyn OverlaySink>,
    ) -> Self {
        Self {
            config,
            api,
            media,
            detector,
            overlay,
            status: Arc::new(AtomicU8::new(SessionStatus::Idle as u8)),
            epoch: Arc::new(AtomicU64::new(0)),
            fetch_seq: Arc::new(AtomicU64::new(0)),
            submissions: Arc::new(AtomicUsize::new(0)),
            roster: Arc::new(RwLock::new(RosterCache::new())),
            outcome: Arc::new(RwLock::new(None)),
            started_at: Arc::new(RwLock::new(None)),
            transitions: Mutex::new(Transitions::default()),
        }
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus::from_u8(self.status.load(Ordering::SeqCst))
    }

    fn set_status(&self, status: SessionStatus) {
        self.status.store(status as u8, Ordering::SeqCst);
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Store the operator's chosen session. Valid only while idle; no
    /// hardware is touched until `begin`.
    pub async fn select_session(
        &self,
        scheduled: ScheduledSession,
    ) -> Result<(), ControllerError> {
        let mut guard = self.transitions.lock().await;
        if self.status() != SessionStatus::Idle {
            return Err(ControllerError::NotIdle);
        }

        info!(
            session_id = scheduled.id,
            group = %scheduled.group.code,
            "session selected"
        );
        guard.selected = Some(scheduled);
        Ok(())
    }

    pub async fn selected_session(&self) -> Option<ScheduledSession> {
        self.transitions.lock().await.selected.clone()
    }

    /// Acquire the camera and start the three periodic tasks.
    ///
    /// A call while not idle is a no-op; acquisition failure rolls back to
    /// idle with nothing retained and no task started.
    pub async fn begin(&self) -> Result<(), ControllerError> {
        let mut guard = self.transitions.lock().await;
        if self.status() != SessionStatus::Idle {
            warn!(status = ?self.status(), "begin ignored, controller not idle");
            return Ok(());
        }
        let scheduled = guard
            .selected
            .clone()
            .ok_or(ControllerError::NoSessionSelected)?;

        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.set_status(SessionStatus::Acquiring);
        info!(session_id = scheduled.id, epoch, "starting live session");

        if let Err(e) = self.media.acquire(&self.config.constraints).await {
            self.set_status(SessionStatus::Idle);
            error!(session_id = scheduled.id, "camera acquisition failed: {e}");
            return Err(ControllerError::Hardware(e));
        }

        self.roster.write().await.clear();
        *self.outcome.write().await = None;
        *self.started_at.write().await = Some(Utc::now());
        self.submissions.store(0, Ordering::SeqCst);
        self.fetch_seq.store(0, Ordering::SeqCst);

        let (refresh_tx, refresh_rx) = mpsc::channel(8);
        self.set_status(SessionStatus::Live);

        let gate = EpochGate {
            tag: epoch,
            status: Arc::clone(&self.status),
            epoch: Arc::clone(&self.epoch),
        };
        guard.tasks = vec![
            self.spawn_overlay(gate.clone()),
            self.spawn_submitter(gate.clone(), scheduled.id, refresh_tx.clone()),
            self.spawn_roster_sync(gate, scheduled.id, refresh_rx),
        ];
        guard.refresh_tx = Some(refresh_tx);

        info!(session_id = scheduled.id, "live session started");
        Ok(())
    }

    /// Tear the live session down: cancel the schedulers, release the
    /// camera, clear session state, return to idle. No-op unless live.
    ///
    /// In-flight requests are not aborted; they run detached and their
    /// results fail the epoch gate once the status leaves Live.
    pub async fn stop(&self) {
        let mut guard = self.transitions.lock().await;
        if self.status() != SessionStatus::Live {
            debug!(status = ?self.status(), "stop ignored, no live session");
            return;
        }
        self.set_status(SessionStatus::Stopping);

        // No new cycles from here on
        guard.refresh_tx = None;
        for task in guard.tasks.drain(..) {
            task.abort();
        }

        self.media.release().await;
        self.overlay.clear();

        guard.selected = None;
        self.roster.write().await.clear();
        *self.outcome.write().await = None;
        *self.started_at.write().await = None;

        self.set_status(SessionStatus::Idle);
        info!("live session stopped");
    }

    /// Manually correct one roster entry, then pull the authoritative
    /// roster right away instead of waiting for the next scheduled tick.
    /// On failure the cached roster is left untouched.
    pub async fn review(
        &self,
        entry_id: i64,
        status: AttendanceStatus,
    ) -> Result<RosterEntry, ControllerError> {
        if self.status() != SessionStatus::Live {
            return Err(ControllerError::NotLive);
        }

        let updated = self.api.update_attendance(entry_id, status).await?;
        info!(entry_id, ?status, "attendance entry updated manually");

        let guard = self.transitions.lock().await;
        if let Some(tx) = &guard.refresh_tx {
            let _ = tx.try_send(());
        }
        Ok(updated)
    }

    /// Current cached roster, in stable order.
    pub async fn roster(&self) -> Vec<RosterEntry> {
        self.roster.read().await.to_vec()
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        let session_id = self.transitions.lock().await.selected.as_ref().map(|s| s.id);
        ControllerSnapshot {
            status: self.status(),
            session_id,
            epoch: self.epoch(),
            started_at: *self.started_at.read().await,
            outcome: self.outcome.read().await.clone(),
            roster_size: self.roster.read().await.len(),
            submissions: self.submissions.load(Ordering::SeqCst),
        }
    }

    /// Fast cosmetic loop: frame -> local detection -> scaled markers.
    /// Failures are logged and skipped, never escalated.
    fn spawn_overlay(&self, gate: EpochGate) -> JoinHandle<()> {
        let media = Arc::clone(&self.media);
        let detector = Arc::clone(&self.detector);
        let sink = Arc::clone(&self.overlay);
        let period = self.config.detection_period;

        tokio::spawn(async move {
            info!("detection overlay task started");
            let mut tick = interval(period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tick.tick().await;
                if !gate.is_current() {
                    break;
                }
                let Some(frame) = media.current_frame() else {
                    continue;
                };
                match detector.detect_faces(&frame) {
                    Ok(regions) => {
                        let scaled = scale_to_display(
                            &regions,
                            (frame.width, frame.height),
                            sink.display_size(),
                        );
                        sink.draw(&scaled);
                    }
                    Err(e) => warn!("face detection cycle failed: {e}"),
                }
            }
            info!("detection overlay task stopped");
        })
    }

    /// Medium-cadence loop: capture a still, submit it for recognition.
    /// The network call runs detached so a slow response never delays the
    /// next cycle or `stop()`; the cadence itself is the retry mechanism.
    fn spawn_submitter(
        &self,
        gate: EpochGate,
        session_id: i64,
        refresh_tx: mpsc::Sender<()>,
    ) -> JoinHandle<()> {
        let media = Arc::clone(&self.media);
        let api = Arc::clone(&self.api);
        let outcome = Arc::clone(&self.outcome);
        let submissions = Arc::clone(&self.submissions);
        let period = self.config.submission_period;
        let quality = self.config.jpeg_quality;

        tokio::spawn(async move {
            info!("recognition submitter task started");
            // First submission after one full period
            let mut tick = interval_at(Instant::now() + period, period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tick.tick().await;
                if !gate.is_current() {
                    break;
                }
                let Some(frame) = media.current_frame() else {
                    debug!("no frame available for recognition yet");
                    continue;
                };
                let jpeg = match frame.to_jpeg(quality) {
                    Ok(jpeg) => jpeg,
                    Err(e) => {
                        warn!("failed to encode capture: {e}");
                        continue;
                    }
                };
                submissions.fetch_add(1, Ordering::SeqCst);

                let api = Arc::clone(&api);
                let gate = gate.clone();
                let outcome = Arc::clone(&outcome);
                let refresh_tx = refresh_tx.clone();
                tokio::spawn(async move {
                    let result = api.recognize(session_id, jpeg).await;

                    // Lock first: stop() clears the outcome after leaving
                    // Live, so checking under the lock closes that window.
                    let mut current = outcome.write().await;
                    if !gate.is_current() {
                        debug!(session_id, "stale recognition response discarded");
                        return;
                    }
                    match result {
                        Ok(response) => {
                            if let Some(count) = response.recognized_count {
                                debug!(session_id, count, "recognition upserted attendance");
                            }
                            let message = if response.message.is_empty() {
                                "No new students recognized".to_string()
                            } else {
                                response.message
                            };
                            *current = Some(RecognitionOutcome::ok(message));
                            drop(current);
                            // The roster may have changed server-side
                            let _ = refresh_tx.try_send(());
                        }
                        Err(e) => {
                            *current = Some(RecognitionOutcome::error(e.to_string()));
                        }
                    }
                });
            }
            info!("recognition submitter task stopped");
        })
    }

    /// Slow-cadence loop plus on-demand pokes: full-replace roster refresh.
    /// Each fetch carries a sequence number; out-of-order completions are
    /// rejected by the cache.
    fn spawn_roster_sync(
        &self,
        gate: EpochGate,
        session_id: i64,
        mut refresh_rx: mpsc::Receiver<()>,
    ) -> JoinHandle<()> {
        let api = Arc::clone(&self.api);
        let roster = Arc::clone(&self.roster);
        let fetch_seq = Arc::clone(&self.fetch_seq);
        let period = self.config.roster_period;

        tokio::spawn(async move {
            info!("roster sync task started");
            // First refresh fires immediately
            let mut tick = interval(period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = tick.tick() => {}
                    poke = refresh_rx.recv() => {
                        if poke.is_none() {
                            break;
                        }
                    }
                }
                if !gate.is_current() {
                    break;
                }
                let seq = fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;

                let api = Arc::clone(&api);
                let gate = gate.clone();
                let roster = Arc::clone(&roster);
                tokio::spawn(async move {
                    match api.attendance_log(session_id).await {
                        Ok(snapshot) => {
                            let mut cache = roster.write().await;
                            if !gate.is_current() {
                                debug!(session_id, "stale roster snapshot discarded");
                                return;
                            }
                            if !cache.replace(seq, snapshot) {
                                debug!(seq, "out-of-order roster snapshot ignored");
                            }
                        }
                        Err(e) => {
                            warn!("roster refresh failed, keeping last snapshot: {e}");
                        }
                    }
                });
            }
            info!("roster sync task stopped");
        })
    }
}
