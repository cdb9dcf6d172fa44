//! Hit regions supplied by the presentation layer.
//!
//! Input handles, dock zones and UI chrome are drawn by the host, not by the
//! engine, so only the host knows where they are. A [`HitProbe`] answers
//! "what is under this client-space point" for those elements. The browser
//! build asks the DOM (see [`crate::dom::DomProbe`]); everything else, tests
//! included, uses the [`HitRegistry`] the renderer fills each frame.

#[cfg(test)]
#[path = "probe_test.rs"]
mod probe_test;

use std::fmt::Debug;

use crate::camera::Point;
use crate::doc::{DockMode, NodeId, ValueType};
use crate::hit::Rect;

/// An input handle found under the pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleHit {
    pub node_id: NodeId,
    /// `None` for the node's default input.
    pub handle_id: Option<String>,
    /// Declared value type; `None` accepts any type.
    pub declared_type: Option<ValueType>,
}

/// Query interface over host-drawn hit regions. Points are in client space.
pub trait HitProbe: Debug {
    /// The input handle under `client`, if any.
    fn input_handle_at(&self, client: Point) -> Option<HandleHit>;

    /// The dock drop zone under `client`, if any.
    fn dock_zone_at(&self, client: Point) -> Option<DockMode>;

    /// Whether `client` is over a menu, toolbar or other element that is not open canvas.
    fn is_over_chrome(&self, client: Point) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
enum Region {
    InputHandle(HandleHit),
    DockZone(DockMode),
    Chrome,
}

/// In-process list of hit regions. Regions registered later sit on top.
#[derive(Debug, Clone, Default)]
pub struct HitRegistry {
    regions: Vec<(Rect, Region)>,
}

impl HitRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_input_handle(&mut self, rect: Rect, hit: HandleHit) {
        self.regions.push((rect, Region::InputHandle(hit)));
    }

    pub fn register_dock_zone(&mut self, rect: Rect, mode: DockMode) {
        self.regions.push((rect, Region::DockZone(mode)));
    }

    pub fn register_chrome(&mut self, rect: Rect) {
        self.regions.push((rect, Region::Chrome));
    }

    /// Drop every region belonging to `node`.
    pub fn remove_node(&mut self, node: &NodeId) {
        self.regions.retain(|(_, r)| !matches!(r, Region::InputHandle(h) if h.node_id == *node));
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    fn topmost_at(&self, client: Point) -> Option<&Region> {
        self.regions.iter().rev().find(|(rect, _)| rect.contains(client)).map(|(_, region)| region)
    }
}

impl HitProbe for HitRegistry {
    fn input_handle_at(&self, client: Point) -> Option<HandleHit> {
        match self.topmost_at(client)? {
            Region::InputHandle(hit) => Some(hit.clone()),
            _ => None,
        }
    }

    fn dock_zone_at(&self, client: Point) -> Option<DockMode> {
        match self.topmost_at(client)? {
            Region::DockZone(mode) => Some(*mode),
            _ => None,
        }
    }

    fn is_over_chrome(&self, client: Point) -> bool {
        matches!(self.topmost_at(client), Some(Region::Chrome | Region::DockZone(_)))
    }
}
