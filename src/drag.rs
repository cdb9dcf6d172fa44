//! Node drag, group drag and resize.
//!
//! Every frame positions each dragged node from the pointer and the offset
//! captured at pointer-down (`new = pointer - offset`), never from the previous
//! frame, so the result only depends on where the pointer is now. Smart guides
//! apply to single-node drags; grid snapping applies to the final coordinate.
//!
//! Dropping commits group membership in one step: groups that lost their last
//! member are deleted and every touched group's bounds are recomputed.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use std::collections::HashMap;

use crate::camera::Point;
use crate::consts::{DOCK_SIDE_THRESHOLD_PX, DOCK_TOP_THRESHOLD_PX, GROUP_DROP_SHRINK, REROUTE_SPLIT_TOLERANCE_PX};
use crate::doc::{Connection, DockMode, GroupId, NodeId, NodePosition};
use crate::engine::{Action, EngineCore};
use crate::hit::{self, Rect};
use crate::input::{Button, Gesture, Modifiers, Tool};
use crate::snap::smart_guides;

/// State of a node drag, captured at pointer-down.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeDrag {
    /// Node the pointer went down on.
    pub primary: NodeId,
    /// `pointer_world - node.position` for every dragged node, primary first.
    pub offsets: Vec<(NodeId, Point)>,
    /// Positions before the drag; used to restore undocked nodes.
    pub initial_positions: HashMap<NodeId, Point>,
    /// Alt-drag: pull the nodes out of their groups.
    pub is_detaching: bool,
    /// An undo point was recorded for this drag.
    pub snapshot_taken: bool,
}

impl NodeDrag {
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.offsets.iter().map(|(id, _)| *id).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupDrag {
    pub id: GroupId,
    /// `pointer_world - group.position` at pointer-down.
    pub offset: Point,
    pub member_offsets: Vec<(NodeId, Point)>,
}

/// Which edge or corner of a node is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeAnchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeAnchor {
    /// Parse the lowercase compass form used by handle elements (`"n"`, `"se"`, ...).
    #[must_use]
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "n" => Some(Self::N),
            "ne" => Some(Self::Ne),
            "e" => Some(Self::E),
            "se" => Some(Self::Se),
            "s" => Some(Self::S),
            "sw" => Some(Self::Sw),
            "w" => Some(Self::W),
            "nw" => Some(Self::Nw),
            _ => None,
        }
    }

    #[must_use]
    pub fn north(self) -> bool {
        matches!(self, Self::N | Self::Ne | Self::Nw)
    }

    #[must_use]
    pub fn south(self) -> bool {
        matches!(self, Self::S | Self::Se | Self::Sw)
    }

    #[must_use]
    pub fn east(self) -> bool {
        matches!(self, Self::E | Self::Ne | Self::Se)
    }

    #[must_use]
    pub fn west(self) -> bool {
        matches!(self, Self::W | Self::Nw | Self::Sw)
    }

    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::N | Self::S => "ns-resize",
            Self::E | Self::W => "ew-resize",
            Self::Ne | Self::Sw => "nesw-resize",
            Self::Nw | Self::Se => "nwse-resize",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResizeGesture {
    pub id: NodeId,
    pub anchor: ResizeAnchor,
    pub start_world: Point,
    /// Raw node box (not the effective box) at pointer-down.
    pub start_rect: Rect,
}

/// New box for a resize from `start` by `delta`, keeping the opposite edges fixed.
///
/// `snap` is applied to the moving edges before the minimum size is enforced.
#[must_use]
pub fn resized_rect(start: Rect, anchor: ResizeAnchor, delta: Point, min: (f64, f64), snap: impl Fn(f64) -> f64) -> Rect {
    let (min_w, min_h) = min;
    let mut r = start;
    if anchor.east() {
        r.width = (snap(start.right() + delta.x) - start.x).max(min_w);
    }
    if anchor.west() {
        r.width = (start.right() - snap(start.x + delta.x)).max(min_w);
        r.x = start.right() - r.width;
    }
    if anchor.south() {
        r.height = (snap(start.bottom() + delta.y) - start.y).max(min_h);
    }
    if anchor.north() {
        r.height = (start.bottom() - snap(start.y + delta.y)).max(min_h);
        r.y = start.bottom() - r.height;
    }
    r
}

impl EngineCore {
    // --- Node drag ---

    /// Pointer went down on a node body.
    pub fn on_node_pointer_down(&mut self, id: NodeId, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.keys.sync(modifiers);
        self.ui.last_pointer = Some(client);
        if button != Button::Primary {
            return self.on_canvas_pointer_down(client, button, modifiers);
        }
        if !self.gesture.is_idle() || !self.doc.contains_node(&id) {
            return Vec::new();
        }

        let mut actions = Vec::new();
        if self.doc.bring_to_front(&id) {
            actions.push(Action::NodeRaised(id));
        }
        actions.extend(self.clear_highlights(&[id]));

        let mut selection = self.ui.selected.clone();
        if modifiers.shift || modifiers.command() {
            if let Some(idx) = selection.iter().position(|n| *n == id) {
                selection.remove(idx);
            } else {
                selection.push(id);
            }
        } else if !selection.contains(&id) {
            selection = vec![id];
        }
        actions.extend(self.set_selection(selection));

        let cutting = self.effective_tool() == Tool::Cutter;
        let edit_ctrl = self.ui.tool == Tool::Edit && modifiers.command() && !modifiers.alt;
        if !cutting && !edit_ctrl {
            let world = self.client_to_world(client);
            let members = if self.ui.is_selected(&id) {
                let mut ids = vec![id];
                ids.extend(self.live_selection().into_iter().filter(|n| *n != id));
                ids
            } else {
                vec![id]
            };
            let mut offsets = Vec::with_capacity(members.len());
            let mut initial_positions = HashMap::with_capacity(members.len());
            for member in members {
                if let Some(node) = self.doc.node(&member) {
                    offsets.push((member, world - node.position));
                    initial_positions.insert(member, node.position);
                }
            }
            self.begin_gesture(Gesture::DraggingNodes(NodeDrag {
                primary: id,
                offsets,
                initial_positions,
                is_detaching: modifiers.alt,
                snapshot_taken: false,
            }));
            actions.push(Action::SetCursor(self.cursor().to_owned()));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub(crate) fn drag_nodes_frame(&mut self, drag: &mut NodeDrag, client: Point) -> Vec<Action> {
        let world = self.client_to_world(client);
        if !drag.snapshot_taken {
            self.take_snapshot();
            drag.snapshot_taken = true;
        }

        // Smart guides for the primary node only, and only when it moves alone.
        let mut delta = Point::ZERO;
        self.ui.guides.clear();
        if drag.offsets.len() == 1 && (self.config.smart_guides || self.keys.shift) {
            if let (Some((_, offset)), Some(node)) = (drag.offsets.first(), self.doc.node(&drag.primary)) {
                let raw = world - *offset;
                let (w, h) = hit::effective_size(node);
                let moving = Rect::new(raw.x, raw.y, w, h);
                let others = self.doc.nodes_bottom_up().filter(|n| n.id != drag.primary).map(hit::effective_rect);
                let snap = smart_guides(moving, others, self.config.snap_threshold_world(self.camera.zoom));
                delta = Point::new(snap.dx, snap.dy);
                self.ui.guides = snap.guides;
            }
        }

        let mut moved = Vec::with_capacity(drag.offsets.len());
        for (id, offset) in &drag.offsets {
            let raw = world - *offset + delta;
            let position = Point::new(self.grid(raw.x), self.grid(raw.y));
            if self.doc.set_position(id, position) {
                moved.push(NodePosition { id: *id, position });
            }
        }

        let ids = drag.node_ids();
        let mut actions = vec![Action::NodesMoved(moved)];
        if !drag.is_detaching {
            actions.extend(self.refresh_groups_of(&ids));
        }
        self.update_dock_hover(drag.primary, client);
        self.ui.drop_target = self.group_drop_target(drag.primary);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Reveal the dock menu and pick the dock zone under the pointer.
    fn update_dock_hover(&mut self, primary: NodeId, client: Point) {
        let dockable = self.doc.node(&primary).is_some_and(|n| n.dock_state.is_none() && !self.kinds.is_reroute(n));
        if !dockable {
            self.ui.dock_menu_visible = false;
            self.ui.dock_hover = None;
            return;
        }
        let canvas = self.viewport.to_canvas(client);
        self.ui.dock_menu_visible = canvas.y < DOCK_TOP_THRESHOLD_PX;
        self.ui.dock_hover = self.probe.dock_zone_at(client).or_else(|| {
            if self.viewport.width <= 0.0 {
                None
            } else if canvas.x < DOCK_SIDE_THRESHOLD_PX {
                Some(DockMode::Left)
            } else if canvas.x > self.viewport.width - DOCK_SIDE_THRESHOLD_PX {
                Some(DockMode::Right)
            } else {
                None
            }
        });
    }

    /// Topmost group whose box overlaps the node's box shrunk by 5% per side.
    fn group_drop_target(&self, node: NodeId) -> Option<GroupId> {
        let node = self.doc.node(&node)?;
        let probe = hit::effective_rect(node).shrink_by_fraction(GROUP_DROP_SHRINK);
        self.doc.groups().iter().rev().find(|g| g.rect().intersects(&probe)).map(|g| g.id)
    }

    pub(crate) fn end_node_drag(&mut self, drag: NodeDrag) -> Vec<Action> {
        let mut actions = Vec::new();

        if let Some(mode) = self.ui.dock_hover {
            let restore_position = drag.initial_positions.get(&drag.primary).copied().unwrap_or_default();
            tracing::debug!(node = %drag.primary, ?mode, "dock requested");
            actions.push(Action::DockRequested { id: drag.primary, mode, restore_position });
        }

        actions.extend(self.split_under_reroute(drag.primary));

        let ids = drag.node_ids();
        let mut affected: Vec<GroupId> = Vec::new();
        if drag.is_detaching {
            for id in &ids {
                for gid in self.doc.groups_containing(id) {
                    if let Some(group) = self.doc.group_mut(&gid) {
                        group.node_ids.remove(id);
                    }
                    affected.push(gid);
                }
            }
        } else if let Some(target) = self.ui.drop_target {
            for id in &ids {
                for gid in self.doc.groups_containing(id) {
                    if gid == target {
                        continue;
                    }
                    if let Some(group) = self.doc.group_mut(&gid) {
                        group.node_ids.remove(id);
                    }
                    affected.push(gid);
                }
            }
            if let Some(group) = self.doc.group_mut(&target) {
                group.node_ids.extend(ids.iter().copied());
                affected.push(target);
            }
        } else {
            for id in &ids {
                affected.extend(self.doc.groups_containing(id));
            }
        }
        actions.extend(self.commit_groups(affected));
        actions
    }

    /// Split the connection under a dropped reroute node into two through it.
    fn split_under_reroute(&mut self, id: NodeId) -> Vec<Action> {
        let Some(node) = self.doc.node(&id) else {
            return Vec::new();
        };
        if !self.kinds.is_reroute(node) {
            return Vec::new();
        }
        let center = hit::effective_rect(node).center();
        let tolerance = self.camera.screen_dist_to_world(REROUTE_SPLIT_TOLERANCE_PX);
        let Some(conn_id) = hit::connection_near(&self.doc, &self.kinds, center, tolerance, Some(id)) else {
            return Vec::new();
        };
        let Some(old) = self.doc.remove_connection(&conn_id) else {
            return Vec::new();
        };
        let upstream = self.doc.node(&old.from_node).and_then(|n| self.kinds.output_type(n, old.from_handle.as_deref()));

        let mut actions = vec![Action::ConnectionRemoved(old.id)];
        let incoming = Connection::new(old.from_node, old.from_handle.clone(), id, None);
        let outgoing = Connection::new(id, None, old.to_node, old.to_handle.clone());
        for conn in [incoming, outgoing] {
            if self.doc.add_connection(conn.clone()) {
                actions.push(Action::ConnectionCreated(conn));
            }
        }
        if let Some(value_type) = upstream {
            if let Some(node) = self.doc.node_mut(&id) {
                node.value_type = Some(value_type);
                actions.push(Action::NodeValueTyped { id, value_type });
            }
        }
        tracing::debug!(reroute = %id, connection = %old.id, "connection split by reroute");
        actions
    }

    // --- Group drag ---

    /// Pointer went down on a group's header.
    pub fn on_group_pointer_down(&mut self, id: GroupId, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.keys.sync(modifiers);
        self.ui.last_pointer = Some(client);
        if button != Button::Primary {
            return self.on_canvas_pointer_down(client, button, modifiers);
        }
        if !self.gesture.is_idle() {
            return Vec::new();
        }
        let Some(group) = self.doc.group(&id) else {
            return Vec::new();
        };
        let world = self.client_to_world(client);
        let member_offsets = self
            .doc
            .nodes_bottom_up()
            .filter(|n| group.node_ids.contains(&n.id))
            .map(|n| (n.id, world - n.position))
            .collect();
        let offset = world - group.position;
        self.begin_gesture(Gesture::DraggingGroup(GroupDrag { id, offset, member_offsets }));
        vec![Action::SetCursor(self.cursor().to_owned()), Action::RenderNeeded]
    }

    pub(crate) fn drag_group_frame(&mut self, drag: &GroupDrag, client: Point) -> Vec<Action> {
        let world = self.client_to_world(client);
        let raw = world - drag.offset;
        let adjust = Point::new(self.grid(raw.x) - raw.x, self.grid(raw.y) - raw.y);

        let mut moved = Vec::with_capacity(drag.member_offsets.len());
        for (id, offset) in &drag.member_offsets {
            let position = world - *offset + adjust;
            if self.doc.set_position(id, position) {
                moved.push(NodePosition { id: *id, position });
            }
        }
        if let Some(group) = self.doc.group_mut(&drag.id) {
            group.position = raw + adjust;
        }
        let ids: Vec<NodeId> = moved.iter().map(|p| p.id).collect();
        let mut actions = vec![Action::NodesMoved(moved)];
        actions.extend(self.refresh_groups_of(&ids));
        actions.push(Action::RenderNeeded);
        actions
    }

    // --- Resize ---

    /// Pointer went down on one of a node's resize handles.
    pub fn on_resize_handle_down(&mut self, id: NodeId, anchor: ResizeAnchor, client: Point) -> Vec<Action> {
        self.ui.last_pointer = Some(client);
        if !self.gesture.is_idle() {
            return Vec::new();
        }
        let Some(node) = self.doc.node(&id) else {
            return Vec::new();
        };
        let start_rect = Rect::new(node.position.x, node.position.y, node.width, node.height);
        let start_world = self.client_to_world(client);
        self.begin_gesture(Gesture::Resizing(ResizeGesture { id, anchor, start_world, start_rect }));
        vec![Action::SetCursor(anchor.cursor().to_owned())]
    }

    pub(crate) fn resize_frame(&mut self, resize: &ResizeGesture, client: Point) -> Vec<Action> {
        let Some(node) = self.doc.node(&resize.id) else {
            return Vec::new();
        };
        let min = self.kinds.min_size(node);
        let delta = self.client_to_world(client) - resize.start_world;
        let r = resized_rect(resize.start_rect, resize.anchor, delta, min, |v| self.grid(v));
        let Some(node) = self.doc.node_mut(&resize.id) else {
            return Vec::new();
        };
        node.position = r.origin();
        node.width = r.width;
        node.height = r.height;

        let mut actions = vec![Action::NodeResized { id: resize.id, position: r.origin(), width: r.width, height: r.height }];
        actions.extend(self.refresh_groups_of(&[resize.id]));
        actions.push(Action::RenderNeeded);
        actions
    }
}
