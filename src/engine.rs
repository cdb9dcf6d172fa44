//! The engine core: one owner for the whole interaction snapshot.
//!
//! `EngineCore` holds the graph mirror, camera, UI state, the active gesture,
//! held keys, undo history, configuration and node-kind registry. Every entry
//! point reads that snapshot, computes the next one, applies it in place and
//! returns the [`Action`]s the host must commit to its own state. The
//! controllers (`drag`, `connect`, `gesture`, `hotkeys`, `align`) add their
//! entry points to `EngineCore` in their own modules.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashSet;
use std::mem;

use crate::camera::{Camera, Point, Viewport};
use crate::config::EngineConfig;
use crate::connect::ConnectingInfo;
use crate::doc::{Connection, ConnectionId, DockMode, GraphDoc, Group, GroupId, Node, NodeId, NodePosition, ValueType};
use crate::history::PositionHistory;
use crate::input::{Button, Gesture, KeyState, Modifiers, Tool, UiState};
use crate::kinds::NodeKinds;
use crate::probe::{HitProbe, HitRegistry};
use crate::snap::snap_to_grid;

/// A mutation or request the host must act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Node positions changed; at most one per call.
    NodesMoved(Vec<NodePosition>),
    NodeResized { id: NodeId, position: Point, width: f64, height: f64 },
    /// Node moved to the top of the z-order.
    NodeRaised(NodeId),
    /// The "newly created" highlight was cleared on these nodes.
    HighlightCleared(Vec<NodeId>),
    /// A reroute node took on the value type routed through it.
    NodeValueTyped { id: NodeId, value_type: ValueType },
    ConnectionCreated(Connection),
    ConnectionRemoved(ConnectionId),
    /// Group created, or its members or bounds changed.
    GroupUpdated(Group),
    GroupDeleted(GroupId),
    SelectionChanged(Vec<NodeId>),
    CameraChanged(Camera),
    ToolChanged(Tool),
    SetCursor(String),
    /// The user dropped a node on a dock zone.
    DockRequested { id: NodeId, mode: DockMode, restore_position: Point },
    /// A connection was released over open canvas; offer to add a connected node there.
    QuickAddRequested { from: ConnectingInfo, world: Point, client: Point },
    Command(Command),
    RenderNeeded,
}

/// Document-level commands the engine cannot carry out itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ToggleCatalog,
    Save,
    Load,
    Copy { ids: Vec<NodeId> },
    Paste { world: Point },
    Duplicate { ids: Vec<NodeId>, with_content: bool },
    /// Delete immediately.
    DeleteNodes { ids: Vec<NodeId> },
    /// Ask the user before deleting.
    ConfirmDelete { ids: Vec<NodeId> },
    ToggleCollapse { ids: Vec<NodeId> },
    AddChatNode { world: Point },
    CreateNode { kind: String, world: Point },
    OpenRadialMenu { client: Point },
    CloseRadialMenu,
}

/// Core engine state. Everything that doesn't depend on the browser.
#[derive(Debug)]
pub struct EngineCore {
    pub doc: GraphDoc,
    pub camera: Camera,
    pub viewport: Viewport,
    pub ui: UiState,
    pub gesture: Gesture,
    pub keys: KeyState,
    pub history: PositionHistory,
    pub config: EngineConfig,
    pub kinds: NodeKinds,
    pub probe: Box<dyn HitProbe>,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            doc: GraphDoc::new(),
            camera: Camera::default(),
            viewport: Viewport::default(),
            ui: UiState::default(),
            gesture: Gesture::Idle,
            keys: KeyState::default(),
            history: PositionHistory::new(),
            config,
            kinds: NodeKinds::with_defaults(),
            probe: Box::new(HitRegistry::new()),
        }
    }

    // --- Host sync ---

    /// Replace the whole graph. Drops the selection, any gesture and history.
    pub fn load_graph(&mut self, nodes: Vec<Node>, connections: Vec<Connection>, groups: Vec<Group>) {
        self.doc.load(nodes, connections, groups);
        self.ui.selected.clear();
        self.ui.clear_transient();
        self.gesture = Gesture::Idle;
        self.history.clear();
        tracing::debug!(nodes = self.doc.node_count(), "graph loaded");
    }

    /// Mirror a node insert or update. Groups holding the node are re-fit.
    pub fn apply_node_upsert(&mut self, node: Node) -> Vec<Action> {
        let id = node.id;
        self.doc.insert_node(node);
        self.commit_groups(self.doc.groups_containing(&id))
    }

    /// Mirror a node deletion. Groups it leaves empty are deleted.
    pub fn apply_node_removed(&mut self, id: &NodeId) -> Vec<Action> {
        let groups = self.doc.groups_containing(id);
        if self.doc.remove_node(id).is_none() {
            return Vec::new();
        }
        let mut actions = Vec::new();
        let before = self.ui.selected.len();
        self.ui.selected.retain(|n| n != id);
        if self.ui.selected.len() != before {
            actions.push(Action::SelectionChanged(self.ui.selected.clone()));
        }
        actions.extend(self.commit_groups(groups));
        actions
    }

    /// Mirror a connection added by the host. Returns `false` for duplicates.
    pub fn apply_connection_added(&mut self, conn: Connection) -> bool {
        self.doc.add_connection(conn)
    }

    pub fn apply_connection_removed(&mut self, id: &ConnectionId) {
        self.doc.remove_connection(id);
    }

    /// Mirror a group insert or update. A group with no members is deleted.
    pub fn apply_group_upsert(&mut self, group: Group) -> Vec<Action> {
        let id = group.id;
        self.doc.insert_group(group);
        self.commit_groups([id])
    }

    pub fn apply_group_removed(&mut self, id: &GroupId) {
        self.doc.remove_group(id);
    }

    /// Update the canvas element's client-space placement.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if !self.camera.is_valid() {
            tracing::warn!("camera corrupt on viewport change; recentering");
            self.camera = viewport.recovery_camera();
        }
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    /// Zoom to `zoom` (clamped) keeping the world point under `pivot_client`
    /// fixed; `None` pivots on the viewport center.
    pub fn set_zoom(&mut self, zoom: f64, pivot_client: Option<Point>) -> Vec<Action> {
        let pivot = match pivot_client {
            Some(client) => self.viewport.to_canvas(client),
            None => self.viewport.center(),
        };
        self.camera = self.camera.zoom_at(zoom, pivot);
        vec![Action::CameraChanged(self.camera), Action::RenderNeeded]
    }

    /// Select the base tool.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        if self.ui.tool == tool {
            return Vec::new();
        }
        self.ui.tool = tool;
        vec![Action::ToolChanged(tool), Action::SetCursor(self.cursor().to_owned())]
    }

    /// Replace the hit probe, e.g. with the DOM probe in the browser.
    pub fn set_probe(&mut self, probe: Box<dyn HitProbe>) {
        self.probe = probe;
    }

    pub fn kinds_mut(&mut self) -> &mut NodeKinds {
        &mut self.kinds
    }

    /// Record the current node positions as an undo point.
    pub fn take_snapshot(&mut self) {
        self.history.take_snapshot(self.doc.positions());
    }

    pub fn undo(&mut self) -> Vec<Action> {
        let Some(previous) = self.history.undo(self.doc.positions()) else {
            return Vec::new();
        };
        self.apply_positions(&previous)
    }

    pub fn redo(&mut self) -> Vec<Action> {
        let Some(next) = self.history.redo(self.doc.positions()) else {
            return Vec::new();
        };
        self.apply_positions(&next)
    }

    // --- Pointer dispatch ---

    /// Pointer moved anywhere over the window.
    pub fn on_pointer_move(&mut self, client: Point, modifiers: Modifiers) -> Vec<Action> {
        self.keys.sync(modifiers);
        self.ui.last_pointer = Some(client);
        let mut gesture = mem::take(&mut self.gesture);
        let actions = match &mut gesture {
            Gesture::Idle | Gesture::Pinching(_) => Vec::new(),
            Gesture::Panning(pan) => self.pan_frame(pan, client),
            Gesture::ZoomDragging(zoom) => self.zoom_drag_frame(zoom, client),
            Gesture::SelectingRect { start_world, .. } => self.rubber_band_frame(*start_world, client),
            Gesture::Cutting => self.cut_frame(client),
            Gesture::DraggingNodes(drag) => self.drag_nodes_frame(drag, client),
            Gesture::DraggingGroup(drag) => self.drag_group_frame(drag, client),
            Gesture::Resizing(resize) => self.resize_frame(resize, client),
            Gesture::Connecting(info) => self.connect_frame(info, client, modifiers),
        };
        self.gesture = gesture;
        actions
    }

    /// Pointer released anywhere. Always ends the active gesture.
    pub fn on_pointer_up(&mut self, client: Point, _button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.keys.sync(modifiers);
        self.ui.last_pointer = Some(client);
        let gesture = mem::take(&mut self.gesture);
        if !gesture.is_idle() {
            tracing::debug!(gesture = gesture.name(), "gesture ended");
        }
        let mut actions = match gesture {
            Gesture::Idle => return Vec::new(),
            Gesture::DraggingNodes(drag) => self.end_node_drag(drag),
            Gesture::Connecting(info) => self.end_connect(&info, client, modifiers),
            Gesture::SelectingRect { start_world, additive } => self.end_rubber_band(start_world, client, additive),
            Gesture::Panning(_)
            | Gesture::Pinching(_)
            | Gesture::ZoomDragging(_)
            | Gesture::DraggingGroup(_)
            | Gesture::Resizing(_)
            | Gesture::Cutting => Vec::new(),
        };
        self.ui.clear_transient();
        actions.push(Action::SetCursor(self.cursor().to_owned()));
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Queries ---

    /// The tool in effect after held-key overrides.
    #[must_use]
    pub fn effective_tool(&self) -> Tool {
        self.keys.effective_tool(self.ui.tool)
    }

    /// CSS cursor for the current gesture or tool.
    #[must_use]
    pub fn cursor(&self) -> &'static str {
        match &self.gesture {
            Gesture::Panning(_) | Gesture::DraggingNodes(_) | Gesture::DraggingGroup(_) => "grabbing",
            Gesture::Resizing(resize) => resize.anchor.cursor(),
            Gesture::Connecting(_) => "crosshair",
            _ => self.effective_tool().cursor(),
        }
    }

    #[must_use]
    pub fn selection(&self) -> &[NodeId] {
        &self.ui.selected
    }

    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.doc.node(id)
    }

    // --- Shared helpers for the controllers ---

    /// Convert a client-space point to world space.
    #[must_use]
    pub fn client_to_world(&self, client: Point) -> Point {
        self.camera.screen_to_world(self.viewport.to_canvas(client))
    }

    /// Where keyboard-created nodes appear: under the pointer, else the viewport center.
    pub(crate) fn creation_point(&self) -> Point {
        let world = match self.ui.last_pointer {
            Some(client) => self.client_to_world(client),
            None => self.camera.screen_to_world(self.viewport.center()),
        };
        Point::new(self.grid(world.x), self.grid(world.y))
    }

    /// Snap a coordinate when grid snapping is enabled.
    pub(crate) fn grid(&self, value: f64) -> f64 {
        if self.config.grid_snap { snap_to_grid(value, self.config.grid_size) } else { value }
    }

    pub(crate) fn begin_gesture(&mut self, gesture: Gesture) {
        tracing::debug!(gesture = gesture.name(), "gesture started");
        self.gesture = gesture;
    }

    /// Replace the selection, returning an action only when it changed.
    pub(crate) fn set_selection(&mut self, ids: Vec<NodeId>) -> Option<Action> {
        if ids == self.ui.selected {
            return None;
        }
        self.ui.selected = ids;
        Some(Action::SelectionChanged(self.ui.selected.clone()))
    }

    /// Clear the "newly created" flag on `ids`, returning an action if any were set.
    pub(crate) fn clear_highlights(&mut self, ids: &[NodeId]) -> Option<Action> {
        let mut cleared = Vec::new();
        for id in ids {
            if let Some(node) = self.doc.node_mut(id) {
                if node.is_newly_created {
                    node.is_newly_created = false;
                    cleared.push(*id);
                }
            }
        }
        (!cleared.is_empty()).then_some(Action::HighlightCleared(cleared))
    }

    /// Selected ids that still resolve to nodes.
    pub(crate) fn live_selection(&self) -> Vec<NodeId> {
        self.ui.selected.iter().copied().filter(|id| self.doc.contains_node(id)).collect()
    }

    /// Recompute bounds of every group containing any of `nodes`.
    pub(crate) fn refresh_groups_of(&mut self, nodes: &[NodeId]) -> Vec<Action> {
        let affected: Vec<GroupId> = self
            .doc
            .groups()
            .iter()
            .filter(|g| nodes.iter().any(|n| g.node_ids.contains(n)))
            .map(|g| g.id)
            .collect();
        self.refresh_groups(&affected)
    }

    fn refresh_groups(&mut self, ids: &[GroupId]) -> Vec<Action> {
        let mut actions = Vec::new();
        for id in ids {
            if self.doc.refresh_group_bounds(id) {
                if let Some(group) = self.doc.group(id) {
                    actions.push(Action::GroupUpdated(group.clone()));
                }
            }
        }
        actions
    }

    /// Finish a membership change: delete groups left empty, then recompute
    /// and publish the bounds of the survivors among `affected`.
    pub(crate) fn commit_groups(&mut self, affected: impl IntoIterator<Item = GroupId>) -> Vec<Action> {
        let mut seen = HashSet::new();
        let affected: Vec<GroupId> = affected.into_iter().filter(|id| seen.insert(*id)).collect();
        let deleted = self.doc.prune_empty_groups();
        let mut actions: Vec<Action> = deleted.iter().map(|id| Action::GroupDeleted(*id)).collect();
        let survivors: Vec<GroupId> = affected.into_iter().filter(|id| !deleted.contains(id)).collect();
        actions.extend(self.refresh_groups(&survivors));
        actions
    }

    /// Apply `positions` and republish the affected nodes and groups.
    pub(crate) fn apply_positions(&mut self, positions: &[NodePosition]) -> Vec<Action> {
        let moved: Vec<NodePosition> = positions.iter().copied().filter(|p| self.doc.set_position(&p.id, p.position)).collect();
        if moved.is_empty() {
            return Vec::new();
        }
        let ids: Vec<NodeId> = moved.iter().map(|p| p.id).collect();
        let mut actions = vec![Action::NodesMoved(moved)];
        actions.extend(self.refresh_groups_of(&ids));
        actions.push(Action::RenderNeeded);
        actions
    }
}
