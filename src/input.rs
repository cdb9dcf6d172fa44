//! Input model: tools, modifier keys, key state, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of an event.
//! `KeyState` tracks held modifiers between events and derives the *effective*
//! tool from them. `Gesture` is the single gesture tracked between pointer-down
//! and pointer-up; holding it in one enum is what guarantees that panning,
//! dragging, resizing, selecting and connecting can never overlap.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::camera::{PanGesture, PinchGesture, Point, ZoomDragGesture};
use crate::connect::{ConnectingInfo, ConnectionTarget};
use crate::doc::{DockMode, GroupId, NodeId};
use crate::drag::{GroupDrag, NodeDrag, ResizeGesture};
use crate::hit::Rect;
use crate::snap::SmartGuide;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Default pointer: select, drag, connect, pan on empty canvas.
    #[default]
    Edit,
    /// Rubber-band selection on empty canvas.
    Selection,
    /// Horizontal drag zooms around the press point.
    Zoom,
    /// Sweeping over connections removes them.
    Cutter,
    /// Clicking the canvas requests a reroute node.
    Reroute,
}

impl Tool {
    /// CSS cursor for this tool while idle.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Edit => "default",
            Self::Selection => "crosshair",
            Self::Zoom => "zoom-in",
            Self::Cutter => "cell",
            Self::Reroute => "copy",
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }

    #[must_use]
    pub fn any(self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Modifier tier of a node-creation shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModifierTier {
    #[default]
    Plain,
    Shift,
    CtrlShift,
}

impl ModifierTier {
    /// The tier `modifiers` selects, or `None` for combinations with no tier (e.g. Alt).
    #[must_use]
    pub fn of(modifiers: Modifiers) -> Option<Self> {
        match (modifiers.command(), modifiers.shift, modifiers.alt) {
            (false, false, false) => Some(Self::Plain),
            (false, true, false) => Some(Self::Shift),
            (true, true, false) => Some(Self::CtrlShift),
            _ => None,
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// A keyboard event as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    /// Physical key code (`KeyboardEvent.code`), e.g. `"KeyA"`, `"Digit1"`, `"Delete"`.
    pub code: String,
    pub modifiers: Modifiers,
    /// Auto-repeat flag reported by the browser.
    pub repeat: bool,
    /// Focus is inside a text input, textarea or contenteditable.
    pub in_text_field: bool,
}

impl KeyInput {
    #[must_use]
    pub fn new(code: impl Into<String>, modifiers: Modifiers) -> Self {
        Self { code: code.into(), modifiers, repeat: false, in_text_field: false }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Modifier keys held between events.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// `Z` held: temporary zoom tool.
    pub z_held: bool,
    /// Space held: radial menu open.
    pub space_held: bool,
}

impl KeyState {
    /// Sync the modifier flags from an event's modifier snapshot.
    pub fn sync(&mut self, modifiers: Modifiers) {
        self.shift = modifiers.shift;
        self.ctrl = modifiers.command();
        self.alt = modifiers.alt;
    }

    /// The tool actually in effect given `base` and the held keys.
    #[must_use]
    pub fn effective_tool(&self, base: Tool) -> Tool {
        if self.z_held {
            return Tool::Zoom;
        }
        if base != Tool::Edit {
            return base;
        }
        match (self.ctrl, self.alt, self.shift) {
            (true, true, _) => Tool::Reroute,
            (true, false, _) => Tool::Cutter,
            (false, _, true) => Tool::Selection,
            _ => Tool::Edit,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Transient UI state exposed to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Tool chosen by the user (before key-state overrides).
    pub tool: Tool,
    /// Selected node ids, in selection order.
    pub selected: Vec<NodeId>,
    /// Rubber-band rectangle in world space.
    pub marquee: Option<Rect>,
    /// Alignment guides for the node being dragged.
    pub guides: Vec<SmartGuide>,
    /// Group that would receive the dragged nodes on drop.
    pub drop_target: Option<GroupId>,
    /// Top-of-canvas dock menu is revealed.
    pub dock_menu_visible: bool,
    /// Dock mode the dragged node would take on drop.
    pub dock_hover: Option<DockMode>,
    /// World-space end of the connection being drawn.
    pub connection_cursor: Option<Point>,
    /// Input handle the connection would attach to on drop.
    pub connection_target: Option<ConnectionTarget>,
    /// Node under the pointer while connecting, valid target or not.
    pub hovered_node: Option<NodeId>,
    /// Client-space anchor of the open radial menu.
    pub radial_menu: Option<Point>,
    /// Last client-space pointer position seen by the engine.
    pub last_pointer: Option<Point>,
}

impl UiState {
    #[must_use]
    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.selected.contains(id)
    }

    /// Clear every per-gesture overlay.
    pub fn clear_transient(&mut self) {
        self.marquee = None;
        self.guides.clear();
        self.drop_target = None;
        self.dock_menu_visible = false;
        self.dock_hover = None;
        self.connection_cursor = None;
        self.connection_target = None;
        self.hovered_node = None;
    }
}

/// The single active gesture.
///
/// Each active variant carries the context captured at pointer-down so every
/// frame can be computed from the start state rather than accumulated deltas.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging the canvas.
    Panning(PanGesture),
    /// Two-finger pinch zoom.
    Pinching(PinchGesture),
    /// Zoom tool horizontal drag.
    ZoomDragging(ZoomDragGesture),
    /// Rubber-band selection.
    SelectingRect {
        /// World-space corner where the drag started.
        start_world: Point,
        /// Shift was held: add to the existing selection.
        additive: bool,
    },
    /// Moving one or more nodes.
    DraggingNodes(NodeDrag),
    /// Moving a group and its members.
    DraggingGroup(GroupDrag),
    /// Resizing a node by one of its handles.
    Resizing(ResizeGesture),
    /// Drawing a connection from an output handle.
    Connecting(ConnectingInfo),
    /// Cutter tool stroke.
    Cutting,
}

impl Gesture {
    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Panning(_) => "pan",
            Self::Pinching(_) => "pinch",
            Self::ZoomDragging(_) => "zoom-drag",
            Self::SelectingRect { .. } => "select-rect",
            Self::DraggingNodes(_) => "drag-nodes",
            Self::DraggingGroup(_) => "drag-group",
            Self::Resizing(_) => "resize",
            Self::Connecting(_) => "connect",
            Self::Cutting => "cut",
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
