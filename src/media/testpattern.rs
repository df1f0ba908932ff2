use super::frame::VideoFrame;
use super::source::{CaptureConstraints, MediaError, MediaSource};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;
use tracing::info;

/// Synthetic capture source producing a moving gradient. Stands in for a
/// physical camera in demos and on machines without capture hardware.
pub struct TestPatternSource {
    acquired: AtomicBool,
    state: Mutex<Option<PatternState>>,
}

struct PatternState {
    constraints: CaptureConstraints,
    acquired_at: Instant,
}

impl TestPatternSource {
    pub fn new() -> Self {
        Self {
            acquired: AtomicBool::new(false),
            state: Mutex::new(None),
        }
    }
}

impl Default for TestPatternSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MediaSource for TestPatternSource {
    async fn acquire(&self, constraints: &CaptureConstraints) -> Result<(), MediaError> {
        if self.acquired.swap(true, Ordering::SeqCst) {
            return Err(MediaError::AlreadyAcquired);
        }

        let mut state = self.state.lock().unwrap();
        *state = Some(PatternState {
            constraints: constraints.clone(),
            acquired_at: Instant::now(),
        });

        info!(
            width = constraints.width,
            height = constraints.height,
            "test pattern source acquired"
        );
        Ok(())
    }

    fn current_frame(&self) -> Option<VideoFrame> {
        let state = self.state.lock().unwrap();
        let state = state.as_ref()?;

        let (w, h) = (state.constraints.width, state.constraints.height);
        let elapsed_ms = state.acquired_at.elapsed().as_millis() as u64;
        let phase = (elapsed_ms / 40) as u8;

        let mut pixels = Vec::with_capacity((w * h * 3) as usize);
        for y in 0..h {
            for x in 0..w {
                pixels.push((x as u8).wrapping_add(phase));
                pixels.push((y as u8).wrapping_sub(phase));
                pixels.push(phase);
            }
        }

        Some(VideoFrame {
            pixels,
            width: w,
            height: h,
            timestamp_ms: elapsed_ms,
        })
    }

    async fn release(&self) {
        if self.acquired.swap(false, Ordering::SeqCst) {
            let mut state = self.state.lock().unwrap();
            *state = None;
            info!("test pattern source released");
        }
    }

    fn is_acquired(&self) -> bool {
        self.acquired.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "test-pattern"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_is_exclusive() {
        let source = TestPatternSource::new();
        let constraints = CaptureConstraints::default();

        source.acquire(&constraints).await.unwrap();
        assert!(matches!(
            source.acquire(&constraints).await,
            Err(MediaError::AlreadyAcquired)
        ));
    }

    #[tokio::test]
    async fn release_is_idempotent() {
        let source = TestPatternSource::new();

        // Never acquired: still a no-op
        source.release().await;
        assert!(!source.is_acquired());

        source.acquire(&CaptureConstraints::default()).await.unwrap();
        source.release().await;
        source.release().await;
        assert!(!source.is_acquired());
        assert!(source.current_frame().is_none());
    }

    #[tokio::test]
    async fn frames_match_constraints() {
        let source = TestPatternSource::new();
        source
            .acquire(&CaptureConstraints {
                width: 32,
                height: 16,
            })
            .await
            .unwrap();

        let frame = source.current_frame().unwrap();
        assert_eq!(frame.width, 32);
        assert_eq!(frame.height, 16);
        assert_eq!(frame.pixels.len(), 32 * 16 * 3);
    }
}
