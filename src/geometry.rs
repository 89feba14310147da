//! Screen geometry types and marker placement math.
//!
//! Every member publishes its window rectangle in absolute screen
//! coordinates. The presentation side translates the other members'
//! rectangles into marker positions expressed in the local window's own
//! coordinate frame, so the indicators stay correct regardless of where
//! the local window sits on screen.

use serde::{Deserialize, Serialize};

/// A window's position and size in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Center point of the rectangle in screen coordinates.
    pub fn center(&self) -> Point {
        Point {
            x: self.left + self.width / 2.0,
            y: self.top + self.height / 2.0,
        }
    }
}

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A marker position in the local window's coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub top: f64,
    pub left: f64,
}

/// The local member's own marker, anchored at the window-relative center.
pub fn local_anchor(own: &Rect) -> Marker {
    Marker {
        top: own.height / 2.0,
        left: own.width / 2.0,
    }
}

/// Marker for another member's window, placed at the local anchor plus the
/// delta between the two absolute centers.
pub fn relative_marker(own: &Rect, other: &Rect) -> Marker {
    let anchor = local_anchor(own);
    let own_center = own.center();
    let other_center = other.center();
    Marker {
        top: anchor.top + (other_center.y - own_center.y),
        left: anchor.left + (other_center.x - own_center.x),
    }
}
