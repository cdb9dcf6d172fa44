//! Grid snapping and smart alignment guides.
//!
//! Smart guides compare the three X anchors (left, center, right) and three Y
//! anchors (top, middle, bottom) of the node being dragged against the same
//! anchors of every other node. The first pair within the threshold wins on
//! each axis; there is no search for the closest candidate.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::GUIDE_MARGIN;
use crate::hit::Rect;

/// Orientation of an alignment guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideOrientation {
    /// A line of constant x.
    Vertical,
    /// A line of constant y.
    Horizontal,
}

/// A render-only alignment line in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmartGuide {
    pub orientation: GuideOrientation,
    /// x for vertical guides, y for horizontal guides.
    pub position: f64,
    /// Start of the line along the other axis.
    pub start: f64,
    /// End of the line along the other axis.
    pub end: f64,
}

/// Result of matching a dragged box against its siblings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuideSnap {
    /// Correction to add to the x position; zero when no vertical guide matched.
    pub dx: f64,
    /// Correction to add to the y position; zero when no horizontal guide matched.
    pub dy: f64,
    /// At most one vertical and one horizontal guide.
    pub guides: Vec<SmartGuide>,
}

/// Round `value` to the nearest multiple of `grid`. Non-positive grids leave it unchanged.
#[must_use]
pub fn snap_to_grid(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 || !grid.is_finite() {
        return value;
    }
    (value / grid).round() * grid
}

#[must_use]
pub fn snap_point(p: Point, grid: f64) -> Point {
    Point::new(snap_to_grid(p.x, grid), snap_to_grid(p.y, grid))
}

fn x_anchors(r: &Rect) -> [f64; 3] {
    [r.x, r.x + r.width * 0.5, r.right()]
}

fn y_anchors(r: &Rect) -> [f64; 3] {
    [r.y, r.y + r.height * 0.5, r.bottom()]
}

/// First anchor pair within `threshold`, as `(correction, matched_anchor)`.
fn first_match(moving: [f64; 3], other: [f64; 3], threshold: f64) -> Option<(f64, f64)> {
    moving.iter().find_map(|a| other.iter().find(|b| (*b - a).abs() < threshold).map(|b| (b - a, *b)))
}

/// Match `moving` against `others` and produce snap corrections and guides.
///
/// `threshold` is in world units; callers scale the pixel threshold by zoom.
#[must_use]
pub fn smart_guides(moving: Rect, others: impl IntoIterator<Item = Rect>, threshold: f64) -> GuideSnap {
    let mut vertical: Option<(f64, f64, Rect)> = None;
    let mut horizontal: Option<(f64, f64, Rect)> = None;

    for other in others {
        if vertical.is_none() {
            if let Some((d, at)) = first_match(x_anchors(&moving), x_anchors(&other), threshold) {
                vertical = Some((d, at, other));
            }
        }
        if horizontal.is_none() {
            if let Some((d, at)) = first_match(y_anchors(&moving), y_anchors(&other), threshold) {
                horizontal = Some((d, at, other));
            }
        }
        if vertical.is_some() && horizontal.is_some() {
            break;
        }
    }

    let mut snap = GuideSnap::default();
    if let Some((dx, _, _)) = vertical {
        snap.dx = dx;
    }
    if let Some((dy, _, _)) = horizontal {
        snap.dy = dy;
    }
    let snapped = Rect::new(moving.x + snap.dx, moving.y + snap.dy, moving.width, moving.height);

    if let Some((_, at, other)) = vertical {
        snap.guides.push(SmartGuide {
            orientation: GuideOrientation::Vertical,
            position: at,
            start: snapped.y.min(other.y) - GUIDE_MARGIN,
            end: snapped.bottom().max(other.bottom()) + GUIDE_MARGIN,
        });
    }
    if let Some((_, at, other)) = horizontal {
        snap.guides.push(SmartGuide {
            orientation: GuideOrientation::Horizontal,
            position: at,
            start: snapped.x.min(other.x) - GUIDE_MARGIN,
            end: snapped.right().max(other.right()) + GUIDE_MARGIN,
        });
    }
    snap
}
