use crate::config::Config;
use crate::media::CaptureConstraints;
use std::time::Duration;

/// Tunables for a live capture session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Requested camera geometry
    pub constraints: CaptureConstraints,

    /// Detection overlay period (fast, cosmetic)
    pub detection_period: Duration,

    /// Recognition submission period; must stay comfortably above the
    /// typical recognition round trip, cycles are not serialized
    pub submission_period: Duration,

    /// Scheduled roster refresh period (refreshes also run on demand)
    pub roster_period: Duration,

    /// JPEG quality for submitted stills (1-100)
    pub jpeg_quality: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            constraints: CaptureConstraints::default(),
            detection_period: Duration::from_millis(100),
            submission_period: Duration::from_secs(5),
            roster_period: Duration::from_secs(10),
            jpeg_quality: 80,
        }
    }
}

impl From<&Config> for SessionConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            constraints: CaptureConstraints {
                width: cfg.capture.width,
                height: cfg.capture.height,
            },
            detection_period: Duration::from_millis(cfg.cadence.detection_ms),
            submission_period: Duration::from_secs(cfg.cadence.submission_secs),
            roster_period: Duration::from_secs(cfg.cadence.roster_secs),
            jpeg_quality: cfg.capture.jpeg_quality,
        }
    }
}
