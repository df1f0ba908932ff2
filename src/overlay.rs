//! Detection overlay output.
//!
//! The overlay task detects faces in frame coordinates; sinks render the
//! regions at whatever size the feed is displayed, so regions are rescaled
//! every cycle before drawing.

use crate::detect::FaceRegion;
use tracing::debug;

/// Where detection markers are drawn. The real UI registers a sink backed
/// by its canvas; headless runs use [`TraceOverlaySink`].
pub trait OverlaySink: Send + Sync {
    /// Size the feed is currently displayed at
    fn display_size(&self) -> (u32, u32);

    /// Replace all markers with the given regions (display coordinates)
    fn draw(&self, regions: &[FaceRegion]);

    /// Remove all markers
    fn clear(&self);
}

/// Map frame-space regions onto the displayed size.
pub fn scale_to_display(
    regions: &[FaceRegion],
    frame_size: (u32, u32),
    display_size: (u32, u32),
) -> Vec<FaceRegion> {
    let (fw, fh) = frame_size;
    if fw == 0 || fh == 0 {
        return Vec::new();
    }
    let sx = display_size.0 as f32 / fw as f32;
    let sy = display_size.1 as f32 / fh as f32;

    regions
        .iter()
        .map(|r| FaceRegion {
            x: r.x * sx,
            y: r.y * sy,
            width: r.width * sx,
            height: r.height * sy,
        })
        .collect()
}

/// Sink that logs marker counts instead of drawing them.
pub struct TraceOverlaySink {
    width: u32,
    height: u32,
}

impl TraceOverlaySink {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl OverlaySink for TraceOverlaySink {
    fn display_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw(&self, regions: &[FaceRegion]) {
        debug!(count = regions.len(), "overlay markers updated");
    }

    fn clear(&self) {
        debug!("overlay cleared");
    }
}
