//! Browser bindings: the DOM hit probe and the canvas-element wrapper.
//!
//! Handle and dock-zone elements follow a small attribute contract:
//!
//! - input handles carry `data-node-id`, `data-handle-id` (empty for the
//!   default handle) and optionally `data-handle-type`
//! - dock drop zones carry `data-dock-mode`
//! - menus, toolbars and other overlays carry `data-canvas-chrome`

use uuid::Uuid;
use web_sys::{Document, Element, HtmlCanvasElement};

use crate::camera::{Camera, Point, Viewport};
use crate::config::EngineConfig;
use crate::doc::{DockMode, NodeId, ValueType};
use crate::engine::{Action, EngineCore};
use crate::input::{Button, KeyInput, Modifiers, Tool, WheelDelta};
use crate::probe::{HandleHit, HitProbe};

const HANDLE_SELECTOR: &str = "[data-node-id][data-handle-id]";
const DOCK_SELECTOR: &str = "[data-dock-mode]";
const CHROME_SELECTOR: &str = "[data-canvas-chrome], [data-dock-mode]";

/// [`HitProbe`] backed by `document.elementFromPoint`.
#[derive(Debug, Clone)]
pub struct DomProbe {
    document: Document,
}

impl DomProbe {
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// The document of the current window, if there is one.
    #[must_use]
    pub fn from_window() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self::new(document))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn element_at(&self, client: Point) -> Option<Element> {
        self.document.element_from_point(client.x as f32, client.y as f32)
    }

    fn closest_at(&self, client: Point, selector: &str) -> Option<Element> {
        self.element_at(client)?.closest(selector).unwrap_or_default()
    }
}

impl HitProbe for DomProbe {
    fn input_handle_at(&self, client: Point) -> Option<HandleHit> {
        let handle = self.closest_at(client, HANDLE_SELECTOR)?;
        let Ok(node_id) = Uuid::parse_str(&handle.get_attribute("data-node-id")?) else {
            return None;
        };
        let handle_id = handle.get_attribute("data-handle-id").filter(|h| !h.is_empty());
        let declared_type = handle.get_attribute("data-handle-type").and_then(|t| ValueType::from_attr(&t));
        Some(HandleHit { node_id, handle_id, declared_type })
    }

    fn dock_zone_at(&self, client: Point) -> Option<DockMode> {
        let zone = self.closest_at(client, DOCK_SELECTOR)?;
        DockMode::from_attr(&zone.get_attribute("data-dock-mode")?)
    }

    fn is_over_chrome(&self, client: Point) -> bool {
        self.closest_at(client, CHROME_SELECTOR).is_some()
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to `canvas`, probing the page DOM for handles.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement, config: EngineConfig) -> Self {
        let mut core = EngineCore::with_config(config);
        if let Some(probe) = DomProbe::from_window() {
            core.set_probe(Box::new(probe));
        }
        let mut engine = Self { canvas, core };
        engine.sync_viewport();
        engine
    }

    /// Re-read the canvas element's placement; call after layout changes.
    pub fn sync_viewport(&mut self) {
        let rect = self.canvas.get_bounding_client_rect();
        self.core.set_viewport(Viewport {
            origin: Point::new(rect.left(), rect.top()),
            width: rect.width(),
            height: rect.height(),
        });
    }

    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        self.core.set_tool(tool)
    }

    // --- Input events ---

    pub fn on_canvas_pointer_down(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_canvas_pointer_down(client, button, modifiers)
    }

    pub fn on_node_pointer_down(&mut self, id: NodeId, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_node_pointer_down(id, client, button, modifiers)
    }

    pub fn on_pointer_move(&mut self, client: Point, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_move(client, modifiers)
    }

    pub fn on_pointer_up(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_pointer_up(client, button, modifiers)
    }

    pub fn on_wheel(&mut self, client: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_wheel(client, delta, modifiers)
    }

    /// Zoom buttons: pivot on the viewport center.
    pub fn set_zoom(&mut self, zoom: f64) -> Vec<Action> {
        self.core.set_zoom(zoom, None)
    }

    pub fn on_key_down(&mut self, key: &KeyInput) -> Vec<Action> {
        self.core.on_key_down(key)
    }

    pub fn on_key_up(&mut self, key: &KeyInput) -> Vec<Action> {
        self.core.on_key_up(key)
    }

    pub fn on_focus_lost(&mut self) -> Vec<Action> {
        self.core.on_focus_lost()
    }

    // --- Queries ---

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.core.camera
    }

    #[must_use]
    pub fn cursor(&self) -> &'static str {
        self.core.cursor()
    }
}
