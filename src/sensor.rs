//! Window geometry sensor seam.

use std::sync::Mutex;

use crate::geometry::Rect;

/// Source of the local window's current screen rectangle.
///
/// This is a pure, synchronous query of an external sensor; the
/// coordination core never writes to it.
#[mockall::automock]
pub trait GeometrySensor: Send + Sync {
    /// Current position and size of the local window.
    fn rect(&self) -> Rect;
}

/// A sensor that reports a fixed rectangle.
pub struct FixedWindow {
    rect: Rect,
}

impl FixedWindow {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }
}

impl GeometrySensor for FixedWindow {
    fn rect(&self) -> Rect {
        self.rect
    }
}

/// A sensor simulating a window that drifts across the screen.
///
/// Every read nudges the rectangle by a fixed step, which is enough to
/// make indicator movement observable in the demo binary without a real
/// windowing system attached.
pub struct SimulatedWindow {
    rect: Mutex<Rect>,
    step_top: f64,
    step_left: f64,
}

impl SimulatedWindow {
    pub fn new(initial: Rect, step_top: f64, step_left: f64) -> Self {
        Self {
            rect: Mutex::new(initial),
            step_top,
            step_left,
        }
    }
}

impl GeometrySensor for SimulatedWindow {
    fn rect(&self) -> Rect {
        let mut rect = self.rect.lock().unwrap_or_else(|e| e.into_inner());
        rect.top += self.step_top;
        rect.left += self.step_left;
        *rect
    }
}
