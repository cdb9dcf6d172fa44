//! Align and distribute a multi-selection.
//!
//! Both operate on effective boxes and only ever move nodes. An undo point is
//! recorded before any node moves.

#[cfg(test)]
#[path = "align_test.rs"]
mod align_test;

use crate::camera::Point;
use crate::doc::{NodeId, NodePosition};
use crate::engine::{Action, EngineCore};
use crate::hit::{self, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    /// Share one vertical center line.
    CenterX,
    /// Share one horizontal center line.
    CenterY,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    Horizontal,
    Vertical,
}

/// Positions that align `items` against their common bounding box.
#[must_use]
pub fn align(items: &[(NodeId, Rect)], alignment: Alignment) -> Vec<NodePosition> {
    let Some(bounds) = Rect::union_all(items.iter().map(|(_, r)| *r)) else {
        return Vec::new();
    };
    items
        .iter()
        .map(|(id, r)| {
            let position = match alignment {
                Alignment::Left => Point::new(bounds.x, r.y),
                Alignment::Right => Point::new(bounds.right() - r.width, r.y),
                Alignment::Top => Point::new(r.x, bounds.y),
                Alignment::Bottom => Point::new(r.x, bounds.bottom() - r.height),
                Alignment::CenterX => Point::new(bounds.center().x - r.width * 0.5, r.y),
                Alignment::CenterY => Point::new(r.x, bounds.center().y - r.height * 0.5),
            };
            NodePosition { id: *id, position }
        })
        .collect()
}

/// Positions that space `items` with equal gaps between the outermost two.
///
/// Needs at least three items; fewer are already evenly spaced.
#[must_use]
pub fn distribute(items: &[(NodeId, Rect)], distribution: Distribution) -> Vec<NodePosition> {
    if items.len() < 3 {
        return Vec::new();
    }
    let horizontal = distribution == Distribution::Horizontal;
    let start = |r: &Rect| if horizontal { r.x } else { r.y };
    let extent = |r: &Rect| if horizontal { r.width } else { r.height };

    let mut sorted: Vec<&(NodeId, Rect)> = items.iter().collect();
    sorted.sort_by(|a, b| start(&a.1).total_cmp(&start(&b.1)));

    let first = sorted[0].1;
    let last = sorted[sorted.len() - 1].1;
    let span = (start(&last) + extent(&last)) - start(&first);
    let occupied: f64 = sorted.iter().map(|(_, r)| extent(r)).sum();
    #[allow(clippy::cast_precision_loss)]
    let gap = (span - occupied) / (sorted.len() - 1) as f64;

    let mut cursor = start(&first);
    sorted
        .into_iter()
        .map(|(id, r)| {
            let position = if horizontal { Point::new(cursor, r.y) } else { Point::new(r.x, cursor) };
            cursor += extent(r) + gap;
            NodePosition { id: *id, position }
        })
        .collect()
}

impl EngineCore {
    fn selection_boxes(&self) -> Vec<(NodeId, Rect)> {
        self.live_selection()
            .into_iter()
            .filter_map(|id| self.doc.node(&id).map(|n| (id, hit::effective_rect(n))))
            .collect()
    }

    /// Align the selected nodes. Needs two or more.
    pub fn align_selection(&mut self, alignment: Alignment) -> Vec<Action> {
        let items = self.selection_boxes();
        if items.len() < 2 {
            return Vec::new();
        }
        self.take_snapshot();
        self.apply_positions(&align(&items, alignment))
    }

    /// Distribute the selected nodes. Needs three or more.
    pub fn distribute_selection(&mut self, distribution: Distribution) -> Vec<Action> {
        let items = self.selection_boxes();
        if items.len() < 3 {
            return Vec::new();
        }
        self.take_snapshot();
        self.apply_positions(&distribute(&items, distribution))
    }
}
