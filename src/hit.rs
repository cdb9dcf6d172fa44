//! Geometry and hit-testing against nodes, groups and connection paths.
//!
//! All functions here are pure. Node boxes are always the *effective* box: a
//! collapsed node is only [`COLLAPSED_HEIGHT`] tall and a docked node is
//! represented on the canvas by a small square proxy.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{COLLAPSED_HEIGHT, CURVE_MIN_REACH, CURVE_SAMPLES, DOCKED_PROXY_SIZE};
use crate::doc::{Connection, ConnectionId, GraphDoc, Node, NodeId};
use crate::kinds::NodeKinds;

/// Axis-aligned rectangle in world (or screen) space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Normalized rectangle spanning two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self { x: a.x.min(b.x), y: a.y.min(b.y), width: (b.x - a.x).abs(), height: (b.y - a.y).abs() }
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Inclusive point containment.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Whether the interiors overlap. Rectangles that only share an edge do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.x < other.right() && self.right() > other.x && self.y < other.bottom() && self.bottom() > other.y
    }

    /// Grow by `d` on every side.
    #[must_use]
    pub fn expand(&self, d: f64) -> Self {
        Self { x: self.x - d, y: self.y - d, width: self.width + d * 2.0, height: self.height + d * 2.0 }
    }

    /// Trim `fraction` of the width and height from every side.
    #[must_use]
    pub fn shrink_by_fraction(&self, fraction: f64) -> Self {
        let dx = self.width * fraction;
        let dy = self.height * fraction;
        Self { x: self.x + dx, y: self.y + dy, width: self.width - dx * 2.0, height: self.height - dy * 2.0 }
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self { x, y, width: self.right().max(other.right()) - x, height: self.bottom().max(other.bottom()) - y }
    }

    /// Bounding box of all rectangles, or `None` for an empty input.
    pub fn union_all(rects: impl IntoIterator<Item = Self>) -> Option<Self> {
        rects.into_iter().reduce(|acc, r| acc.union(&r))
    }
}

/// Width and height of the node's hit box.
#[must_use]
pub fn effective_size(node: &Node) -> (f64, f64) {
    if node.dock_state.is_some() {
        (DOCKED_PROXY_SIZE, DOCKED_PROXY_SIZE)
    } else if node.is_collapsed {
        (node.width, COLLAPSED_HEIGHT)
    } else {
        (node.width, node.height)
    }
}

/// The node's hit box in world space.
#[must_use]
pub fn effective_rect(node: &Node) -> Rect {
    let (w, h) = effective_size(node);
    Rect::new(node.position.x, node.position.y, w, h)
}

/// Topmost node whose effective box, grown by `tolerance`, contains `world`.
#[must_use]
pub fn node_at(doc: &GraphDoc, world: Point, tolerance: f64) -> Option<NodeId> {
    doc.nodes_top_down().find(|n| effective_rect(n).expand(tolerance).contains(world)).map(|n| n.id)
}

/// Where connections leave a node: middle of the right edge.
#[must_use]
pub fn output_anchor(node: &Node) -> Point {
    let r = effective_rect(node);
    Point::new(r.right(), r.y + r.height * 0.5)
}

/// Horizontal-tangent cubic control points for a connection curve.
#[must_use]
pub fn curve_control_points(from: Point, to: Point) -> (Point, Point) {
    let reach = (to.x - from.x).abs().max(CURVE_MIN_REACH) * 0.5;
    (Point::new(from.x + reach, from.y), Point::new(to.x - reach, to.y))
}

/// Polyline approximation of the connection curve from `from` to `to`.
#[must_use]
pub fn curve_points(from: Point, to: Point) -> Vec<Point> {
    let (c1, c2) = curve_control_points(from, to);
    #[allow(clippy::cast_precision_loss)]
    let steps = CURVE_SAMPLES as f64;
    (0..=CURVE_SAMPLES)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / steps;
            let u = 1.0 - t;
            from * (u * u * u) + c1 * (3.0 * u * u * t) + c2 * (3.0 * u * t * t) + to * (t * t * t)
        })
        .collect()
}

/// Shortest distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq < 1e-12 {
        return p.distance(a);
    }
    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Shortest distance from `p` to the connection curve between two anchors.
#[must_use]
pub fn distance_to_curve(p: Point, from: Point, to: Point) -> f64 {
    curve_points(from, to)
        .windows(2)
        .map(|w| distance_to_segment(p, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Distance from `p` to a connection's path, or `None` if an endpoint no longer exists.
///
/// The path ends at the anchor `kinds` reports for the connection's input handle.
#[must_use]
pub fn connection_distance(doc: &GraphDoc, kinds: &NodeKinds, conn: &Connection, p: Point) -> Option<f64> {
    let from = doc.node(&conn.from_node)?;
    let to = doc.node(&conn.to_node)?;
    Some(distance_to_curve(p, output_anchor(from), kinds.input_anchor(to, conn.to_handle.as_deref())))
}

/// First connection whose path passes within `tolerance` of `p`, skipping any touching `exclude`.
#[must_use]
pub fn connection_near(
    doc: &GraphDoc,
    kinds: &NodeKinds,
    p: Point,
    tolerance: f64,
    exclude: Option<NodeId>,
) -> Option<ConnectionId> {
    doc.connections()
        .iter()
        .filter(|c| exclude.is_none_or(|n| !c.touches(n)))
        .find(|c| connection_distance(doc, kinds, c, p).is_some_and(|d| d <= tolerance))
        .map(|c| c.id)
}
