//! Bounded undo/redo of node positions.
//!
//! Only positions are recorded; size, kind, connections and groups are never
//! touched by undo. Each stack holds at most [`HISTORY_CAPACITY`] snapshots and
//! drops the oldest when full.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use crate::consts::HISTORY_CAPACITY;
use crate::doc::NodePosition;

/// Positions of every node at one point in time.
pub type PositionSnapshot = Vec<NodePosition>;

#[derive(Debug, Clone)]
pub struct PositionHistory {
    past: VecDeque<PositionSnapshot>,
    future: VecDeque<PositionSnapshot>,
    capacity: usize,
}

impl Default for PositionHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// History with a custom bound. A capacity of zero is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { past: VecDeque::new(), future: VecDeque::new(), capacity: capacity.max(1) }
    }

    /// Record `positions` as an undo point and forget any redo states.
    pub fn take_snapshot(&mut self, positions: PositionSnapshot) {
        push_bounded(&mut self.past, positions, self.capacity);
        self.future.clear();
    }

    /// Pop the most recent undo point, stashing `current` for redo.
    ///
    /// Returns the positions to restore, or `None` when there is nothing to undo.
    pub fn undo(&mut self, current: PositionSnapshot) -> Option<PositionSnapshot> {
        let previous = self.past.pop_back()?;
        push_bounded(&mut self.future, current, self.capacity);
        Some(previous)
    }

    /// Mirror of [`PositionHistory::undo`].
    pub fn redo(&mut self, current: PositionSnapshot) -> Option<PositionSnapshot> {
        let next = self.future.pop_back()?;
        push_bounded(&mut self.past, current, self.capacity);
        Some(next)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    #[must_use]
    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    #[must_use]
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

fn push_bounded(stack: &mut VecDeque<PositionSnapshot>, snapshot: PositionSnapshot, capacity: usize) {
    stack.push_back(snapshot);
    while stack.len() > capacity {
        stack.pop_front();
    }
}
