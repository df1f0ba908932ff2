use super::frame::VideoFrame;
use anyhow::Result;
use std::sync::Arc;
use thiserror::Error;

/// Requested capture geometry.
#[derive(Debug, Clone)]
pub struct CaptureConstraints {
    pub width: u32,
    pub height: u32,
}

impl Default for CaptureConstraints {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    /// No device present, or the platform denied access
    #[error("camera unavailable: {0}")]
    HardwareUnavailable(String),

    /// Acquiring while a handle is already outstanding is a caller error
    #[error("camera already acquired")]
    AlreadyAcquired,
}

/// Camera capture source.
///
/// Exactly one acquisition may be outstanding at a time. `release` is
/// idempotent and must be safe on a never-acquired source, so every
/// teardown path can call it unconditionally.
#[async_trait::async_trait]
pub trait MediaSource: Send + Sync {
    /// Request exclusive hardware access and start the frame stream.
    async fn acquire(&self, constraints: &CaptureConstraints) -> Result<(), MediaError>;

    /// Latest frame from the stream, `None` until the stream is up.
    fn current_frame(&self) -> Option<VideoFrame>;

    /// Stop the stream and release the hardware. Idempotent.
    async fn release(&self);

    fn is_acquired(&self) -> bool;

    /// Source name for logging
    fn name(&self) -> &str;
}

/// Which capture implementation to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Physical camera via a platform backend
    Camera,
    /// Synthetic moving gradient, for demos and headless operation
    TestPattern,
}

pub struct MediaSourceFactory;

impl MediaSourceFactory {
    pub fn create(kind: MediaKind) -> Result<Arc<dyn MediaSource>> {
        match kind {
            MediaKind::Camera => {
                anyhow::bail!("no camera backend is wired for this platform yet")
            }
            MediaKind::TestPattern => Ok(Arc::new(super::testpattern::TestPatternSource::new())),
        }
    }
}
