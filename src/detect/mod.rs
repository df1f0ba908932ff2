use crate::media::VideoFrame;
use anyhow::Result;

/// Axis-aligned face bounding box in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Local face-detection capability.
///
/// Injected into the session controller so the overlay task and its tests
/// never depend on a concrete detection library. Implementations must treat
/// the frame as read-only and must not perform network I/O; detection here
/// is advisory overlay input only, recognition happens server-side.
pub trait FaceDetector: Send + Sync {
    /// Detector name for logging
    fn name(&self) -> &str;

    fn detect_faces(&self, frame: &VideoFrame) -> Result<Vec<FaceRegion>>;
}

/// Detector that never finds a face. Default when no real model is wired.
pub struct StubDetector;

impl FaceDetector for StubDetector {
    fn name(&self) -> &str {
        "stub"
    }

    fn detect_faces(&self, _frame: &VideoFrame) -> Result<Vec<FaceRegion>> {
        Ok(Vec::new())
    }
}
