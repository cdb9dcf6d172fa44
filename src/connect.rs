//! Drawing connections from output handles to input handles.
//!
//! The target under the pointer is resolved every frame, precise first: the
//! hit probe is asked for an input handle at the raw client point, and only
//! if it finds none does the geometric fallback test node boxes topmost-first
//! and let the node's kind choose the handle. The node under the pointer is
//! tracked separately from the target so a release over an incompatible node
//! can be told apart from a release over empty canvas.

#[cfg(test)]
#[path = "connect_test.rs"]
mod connect_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::CONNECT_TOLERANCE_PX;
use crate::doc::{Connection, ConnectionId, NodeId, ValueType};
use crate::engine::{Action, EngineCore};
use crate::hit;
use crate::input::{Gesture, Modifiers};
use crate::kinds::{TargetQuery, TargetResolution};

/// Connection being drawn, captured on the output handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectingInfo {
    pub from_node: NodeId,
    pub from_handle: Option<String>,
    /// World-space output anchor.
    pub from_point: Point,
    /// Value type the output emits, if known.
    pub from_type: Option<ValueType>,
}

/// Input handle a connection would attach to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTarget {
    pub node_id: NodeId,
    pub handle_id: Option<String>,
}

impl EngineCore {
    /// Pointer went down on an output handle.
    pub fn on_output_handle_down(&mut self, node: NodeId, handle: Option<String>, client: Point) -> Vec<Action> {
        self.ui.last_pointer = Some(client);
        if !self.gesture.is_idle() {
            return Vec::new();
        }
        let Some(source) = self.doc.node(&node) else {
            return Vec::new();
        };
        let info = ConnectingInfo {
            from_node: node,
            from_point: hit::output_anchor(source),
            from_type: self.kinds.output_type(source, handle.as_deref()),
            from_handle: handle,
        };
        self.ui.connection_cursor = Some(self.client_to_world(client));
        self.begin_gesture(Gesture::Connecting(info));
        vec![Action::SetCursor(self.cursor().to_owned()), Action::RenderNeeded]
    }

    pub(crate) fn connect_frame(&mut self, info: &ConnectingInfo, client: Point, modifiers: Modifiers) -> Vec<Action> {
        let world = self.client_to_world(client);
        self.ui.connection_cursor = Some(world);
        self.ui.connection_target = self.resolve_connection_target(info, client, world, modifiers.shift);
        self.ui.hovered_node = hit::node_at(&self.doc, world, self.camera.screen_dist_to_world(CONNECT_TOLERANCE_PX));
        tracing::trace!(target_node = ?self.ui.connection_target.as_ref().map(|t| t.node_id), "connection target");
        vec![Action::RenderNeeded]
    }

    /// Input handle a connection from `info` released at `client` would attach to.
    #[must_use]
    pub fn resolve_connection_target(
        &self,
        info: &ConnectingInfo,
        client: Point,
        world: Point,
        force_replace: bool,
    ) -> Option<ConnectionTarget> {
        if let Some(handle) = self.probe.input_handle_at(client) {
            let type_ok = match (handle.declared_type, info.from_type) {
                (Some(declared), Some(from)) => declared == from,
                _ => true,
            };
            let accepted = type_ok && handle.node_id != info.from_node && self.doc.contains_node(&handle.node_id);
            return accepted.then(|| ConnectionTarget { node_id: handle.node_id, handle_id: handle.handle_id });
        }

        let tolerance = self.camera.screen_dist_to_world(CONNECT_TOLERANCE_PX);
        let node = self.doc.nodes_top_down().find(|n| hit::effective_rect(n).expand(tolerance).contains(world))?;
        if node.id == info.from_node {
            return None;
        }
        let query = TargetQuery {
            node,
            bounds: hit::effective_rect(node),
            pointer: world,
            from_type: info.from_type,
            existing_inputs: self.doc.incoming_count(&node.id),
            force_replace,
        };
        match self.kinds.resolve_target(&query) {
            TargetResolution::Accept(handle_id) => Some(ConnectionTarget { node_id: node.id, handle_id }),
            TargetResolution::Reject => None,
        }
    }

    pub(crate) fn end_connect(&mut self, info: &ConnectingInfo, client: Point, modifiers: Modifiers) -> Vec<Action> {
        let world = self.client_to_world(client);
        let force_replace = modifiers.shift;
        let mut actions = Vec::new();

        if let Some(target) = self.resolve_connection_target(info, client, world, force_replace) {
            if force_replace {
                let occupants: Vec<ConnectionId> =
                    self.doc.incoming(&target.node_id, target.handle_id.as_deref()).iter().map(|c| c.id).collect();
                for id in occupants {
                    actions.extend(self.disconnect(&id));
                }
            }
            let conn = Connection::new(info.from_node, info.from_handle.clone(), target.node_id, target.handle_id);
            if self.doc.add_connection(conn.clone()) {
                tracing::debug!(from = %conn.from_node, to = %conn.to_node, "connection created");
                actions.push(Action::ConnectionCreated(conn));
            }
            actions.extend(self.propagate_reroute_type(target.node_id, info.from_type));
        } else {
            let tolerance = self.camera.screen_dist_to_world(CONNECT_TOLERANCE_PX);
            let over_node = hit::node_at(&self.doc, world, tolerance).is_some();
            if !over_node && !self.probe.is_over_chrome(client) {
                actions.push(Action::QuickAddRequested { from: info.clone(), world, client });
            }
        }
        actions
    }

    fn propagate_reroute_type(&mut self, id: NodeId, value_type: Option<ValueType>) -> Option<Action> {
        let value_type = value_type?;
        let node = self.doc.node(&id)?;
        if !self.kinds.is_reroute(node) || node.value_type == Some(value_type) {
            return None;
        }
        self.doc.node_mut(&id)?.value_type = Some(value_type);
        Some(Action::NodeValueTyped { id, value_type })
    }

    /// Remove a connection.
    pub fn disconnect(&mut self, id: &ConnectionId) -> Vec<Action> {
        match self.doc.remove_connection(id) {
            Some(conn) => vec![Action::ConnectionRemoved(conn.id)],
            None => Vec::new(),
        }
    }

    /// Remove every connection feeding `node`'s input `handle`.
    pub fn disconnect_input(&mut self, node: &NodeId, handle: Option<&str>) -> Vec<Action> {
        let ids: Vec<ConnectionId> = self.doc.incoming(node, handle).iter().map(|c| c.id).collect();
        ids.iter().flat_map(|id| self.disconnect(id)).collect()
    }
}
