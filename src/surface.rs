//! Rendering surface seam.

use tracing::{debug, info};

use crate::geometry::Marker;

/// Consumer of computed marker positions.
///
/// The presentation loop redraws every indicator from scratch each tick:
/// one `clear`, then one `draw_marker` per visible member. A surface that
/// reports itself unavailable makes the whole tick a no-op for that
/// cycle; that is not an error.
#[mockall::automock]
pub trait RenderSurface: Send + Sync {
    /// Whether the surface can be drawn to right now.
    fn is_available(&self) -> bool;

    /// Remove all previously drawn markers.
    fn clear(&self);

    /// Draw one marker at a position in the local window's frame.
    fn draw_marker(&self, marker: Marker);
}

/// A surface that renders markers to the log.
///
/// Stands in for a real drawing surface in the demo binary; each frame
/// shows up as one `clear` debug line and one info line per marker.
#[derive(Default)]
pub struct TracingSurface;

impl TracingSurface {
    pub fn new() -> Self {
        Self
    }
}

impl RenderSurface for TracingSurface {
    fn is_available(&self) -> bool {
        true
    }

    fn clear(&self) {
        debug!("frame cleared");
    }

    fn draw_marker(&self, marker: Marker) {
        info!(top = marker.top, left = marker.left, "marker");
    }
}
