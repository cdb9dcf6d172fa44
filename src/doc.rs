//! Graph model: nodes, connections, groups and the in-memory store.
//!
//! The host application owns the authoritative graph; `GraphDoc` is the
//! engine's mirror of it. Records never hold references to each other: a
//! connection names its endpoints by [`NodeId`], a group lists member ids, and
//! every cross-reference is resolved through the store at the point of use, so
//! a node deleted mid-gesture simply stops resolving.
//!
//! Z-order is an explicit list (last = topmost). Groups are kept in render
//! order with the same convention.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::hit::{self, Rect};

/// Unique identifier for a node.
pub type NodeId = Uuid;
/// Unique identifier for a connection.
pub type ConnectionId = Uuid;
/// Unique identifier for a group.
pub type GroupId = Uuid;

/// Semantic type of the value flowing out of an output handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Text,
    Image,
    Video,
    Audio,
    /// Structured character sheet data.
    Character,
}

impl ValueType {
    /// Parse the lowercase attribute form (`"text"`, `"image"`, ...).
    #[must_use]
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim() {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "character" => Some(Self::Character),
            _ => None,
        }
    }
}

/// Where a node is docked outside the canvas, or which dock zone is hovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockMode {
    Left,
    Right,
    Floating,
    Fullscreen,
}

impl DockMode {
    #[must_use]
    pub fn from_attr(value: &str) -> Option<Self> {
        match value.trim() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "floating" => Some(Self::Floating),
            "fullscreen" => Some(Self::Fullscreen),
            _ => None,
        }
    }
}

/// A node as mirrored from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Host-defined node kind, resolved through [`crate::kinds::NodeKinds`].
    pub kind: String,
    /// World-space top-left corner.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub is_collapsed: bool,
    #[serde(default)]
    pub dock_state: Option<DockMode>,
    /// Highlight shown until the user first touches the node.
    #[serde(default)]
    pub is_newly_created: bool,
    /// Value type inferred for pass-through nodes (reroutes).
    #[serde(default)]
    pub value_type: Option<ValueType>,
}

impl Node {
    /// A plain node of `kind` at `position`.
    #[must_use]
    pub fn new(kind: impl Into<String>, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            position,
            width,
            height,
            is_collapsed: false,
            dock_state: None,
            is_newly_created: false,
            value_type: None,
        }
    }
}

/// A directed edge from an output handle to an input handle.
///
/// `None` handles mean the node's single default handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from_node: NodeId,
    #[serde(default)]
    pub from_handle: Option<String>,
    pub to_node: NodeId,
    #[serde(default)]
    pub to_handle: Option<String>,
}

impl Connection {
    #[must_use]
    pub fn new(from_node: NodeId, from_handle: Option<String>, to_node: NodeId, to_handle: Option<String>) -> Self {
        Self { id: Uuid::new_v4(), from_node, from_handle, to_node, to_handle }
    }

    /// Whether `self` and `other` join the same pair of handles.
    #[must_use]
    pub fn same_endpoints(&self, other: &Self) -> bool {
        self.from_node == other.from_node
            && self.from_handle == other.from_handle
            && self.to_node == other.to_node
            && self.to_handle == other.to_handle
    }

    #[must_use]
    pub fn touches(&self, node: NodeId) -> bool {
        self.from_node == node || self.to_node == node
    }
}

/// A titled container whose bounds always wrap its member nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub title: String,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub node_ids: HashSet<NodeId>,
}

impl Group {
    #[must_use]
    pub fn new(title: impl Into<String>, node_ids: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            position: Point::ZERO,
            width: 0.0,
            height: 0.0,
            node_ids: node_ids.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }
}

/// A node id paired with its world position; the unit of position history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodePosition {
    pub id: NodeId,
    pub position: Point,
}

/// In-memory store of the graph.
#[derive(Debug, Clone, Default)]
pub struct GraphDoc {
    nodes: HashMap<NodeId, Node>,
    /// Z-order, bottom first.
    order: Vec<NodeId>,
    connections: Vec<Connection>,
    /// Render order, bottom first.
    groups: Vec<Group>,
}

impl GraphDoc {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole graph. Node z-order follows the input order.
    ///
    /// Group members that name no loaded node are dropped, and groups left
    /// without members are discarded.
    pub fn load(&mut self, nodes: Vec<Node>, connections: Vec<Connection>, groups: Vec<Group>) {
        self.nodes.clear();
        self.order.clear();
        self.connections.clear();
        self.groups.clear();
        for node in nodes {
            self.insert_node(node);
        }
        for conn in connections {
            self.add_connection(conn);
        }
        for mut group in groups {
            group.node_ids.retain(|id| self.nodes.contains_key(id));
            self.insert_group(group);
        }
        self.prune_empty_groups();
    }

    // --- Nodes ---

    /// Insert or replace a node. New nodes go on top; replaced nodes keep their z-order.
    pub fn insert_node(&mut self, node: Node) {
        if !self.nodes.contains_key(&node.id) {
            self.order.push(node.id);
        }
        self.nodes.insert(node.id, node);
    }

    /// Remove a node together with its connections and group memberships.
    ///
    /// Groups left empty are not pruned here; see [`GraphDoc::prune_empty_groups`].
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let node = self.nodes.remove(id)?;
        self.order.retain(|n| n != id);
        self.connections.retain(|c| !c.touches(*id));
        for group in &mut self.groups {
            group.node_ids.remove(id);
        }
        Some(node)
    }

    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in draw order, bottom first.
    pub fn nodes_bottom_up(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Nodes in hit-test order, topmost first.
    pub fn nodes_top_down(&self) -> impl Iterator<Item = &Node> {
        self.nodes_bottom_up().rev()
    }

    /// Move a node to the top of the z-order. Returns `true` if the order changed.
    pub fn bring_to_front(&mut self, id: &NodeId) -> bool {
        let Some(idx) = self.order.iter().position(|n| n == id) else {
            return false;
        };
        if idx + 1 == self.order.len() {
            return false;
        }
        let id = self.order.remove(idx);
        self.order.push(id);
        true
    }

    /// Set a node's position. Returns `false` if the node is unknown.
    pub fn set_position(&mut self, id: &NodeId, position: Point) -> bool {
        let Some(node) = self.nodes.get_mut(id) else {
            return false;
        };
        node.position = position;
        true
    }

    /// Current positions of every node, in z-order.
    #[must_use]
    pub fn positions(&self) -> Vec<NodePosition> {
        self.nodes_bottom_up().map(|n| NodePosition { id: n.id, position: n.position }).collect()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // --- Connections ---

    #[must_use]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    #[must_use]
    pub fn connection(&self, id: &ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == *id)
    }

    /// Add a connection unless one already joins the same handles (or has the same id).
    ///
    /// Returns `true` when the connection was added.
    pub fn add_connection(&mut self, conn: Connection) -> bool {
        if self.connections.iter().any(|c| c.id == conn.id || c.same_endpoints(&conn)) {
            return false;
        }
        self.connections.push(conn);
        true
    }

    pub fn remove_connection(&mut self, id: &ConnectionId) -> Option<Connection> {
        let idx = self.connections.iter().position(|c| c.id == *id)?;
        Some(self.connections.remove(idx))
    }

    /// Connections feeding `node`'s input `handle`.
    #[must_use]
    pub fn incoming(&self, node: &NodeId, handle: Option<&str>) -> Vec<&Connection> {
        self.connections
            .iter()
            .filter(|c| c.to_node == *node && c.to_handle.as_deref() == handle)
            .collect()
    }

    /// Number of connections feeding any input of `node`.
    #[must_use]
    pub fn incoming_count(&self, node: &NodeId) -> usize {
        self.connections.iter().filter(|c| c.to_node == *node).count()
    }

    // --- Groups ---

    /// Groups in render order, bottom first.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    #[must_use]
    pub fn group(&self, id: &GroupId) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == *id)
    }

    pub fn group_mut(&mut self, id: &GroupId) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == *id)
    }

    /// Insert or replace a group and recompute its bounds from its members.
    pub fn insert_group(&mut self, group: Group) {
        let id = group.id;
        if let Some(existing) = self.group_mut(&id) {
            *existing = group;
        } else {
            self.groups.push(group);
        }
        self.refresh_group_bounds(&id);
    }

    pub fn remove_group(&mut self, id: &GroupId) -> Option<Group> {
        let idx = self.groups.iter().position(|g| g.id == *id)?;
        Some(self.groups.remove(idx))
    }

    /// Ids of every group listing `node` as a member.
    #[must_use]
    pub fn groups_containing(&self, node: &NodeId) -> Vec<GroupId> {
        self.groups.iter().filter(|g| g.node_ids.contains(node)).map(|g| g.id).collect()
    }

    /// Recompute a group's bounds as the box around its members' effective boxes.
    ///
    /// Returns `false` when the group is unknown or has no resolvable members.
    pub fn refresh_group_bounds(&mut self, id: &GroupId) -> bool {
        let Some(group) = self.groups.iter().find(|g| g.id == *id) else {
            return false;
        };
        let rects = group.node_ids.iter().filter_map(|nid| self.nodes.get(nid)).map(hit::effective_rect);
        let Some(bounds) = Rect::union_all(rects) else {
            return false;
        };
        let Some(group) = self.group_mut(id) else {
            return false;
        };
        group.position = bounds.origin();
        group.width = bounds.width;
        group.height = bounds.height;
        true
    }

    /// Delete every group with no members. Returns the deleted ids.
    pub fn prune_empty_groups(&mut self) -> Vec<GroupId> {
        let empty: Vec<GroupId> = self.groups.iter().filter(|g| g.node_ids.is_empty()).map(|g| g.id).collect();
        self.groups.retain(|g| !g.node_ids.is_empty());
        empty
    }
}
