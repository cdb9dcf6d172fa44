//! Canvas-level mouse, touch and wheel gestures.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::camera::{PanGesture, PinchGesture, Point, ZoomDragGesture};
use crate::consts::CUT_TOLERANCE_PX;
use crate::engine::{Action, Command, EngineCore};
use crate::hit::{self, Rect};
use crate::input::{Button, Gesture, Modifiers, Tool, WheelDelta};

/// Node kind requested by the reroute tool.
pub const REROUTE_KIND: &str = "reroute";

impl EngineCore {
    // --- Mouse ---

    /// Pointer went down on empty canvas.
    pub fn on_canvas_pointer_down(&mut self, client: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.keys.sync(modifiers);
        self.ui.last_pointer = Some(client);
        if !self.gesture.is_idle() {
            return Vec::new();
        }
        let canvas = self.viewport.to_canvas(client);
        let mut actions = Vec::new();

        match button {
            Button::Secondary => return actions,
            Button::Middle => self.begin_gesture(Gesture::Panning(PanGesture::begin(&self.camera, canvas))),
            Button::Primary => match self.effective_tool() {
                Tool::Zoom => self.begin_gesture(Gesture::ZoomDragging(ZoomDragGesture::begin(&self.camera, canvas))),
                tool if tool == Tool::Selection || modifiers.shift => {
                    if !modifiers.shift {
                        actions.extend(self.set_selection(Vec::new()));
                    }
                    let start_world = self.client_to_world(client);
                    self.ui.marquee = Some(Rect::from_corners(start_world, start_world));
                    self.begin_gesture(Gesture::SelectingRect { start_world, additive: modifiers.shift });
                }
                Tool::Cutter => {
                    self.begin_gesture(Gesture::Cutting);
                    actions.extend(self.cut_frame(client));
                }
                Tool::Reroute => {
                    let world = self.creation_point_at(client);
                    actions.push(Action::Command(Command::CreateNode { kind: REROUTE_KIND.to_owned(), world }));
                }
                Tool::Edit | Tool::Selection => {
                    self.begin_gesture(Gesture::Panning(PanGesture::begin(&self.camera, canvas)));
                    if !modifiers.any() {
                        actions.extend(self.set_selection(Vec::new()));
                    }
                }
            },
        }
        actions.push(Action::SetCursor(self.cursor().to_owned()));
        actions.push(Action::RenderNeeded);
        actions
    }

    fn creation_point_at(&self, client: Point) -> Point {
        let world = self.client_to_world(client);
        Point::new(self.grid(world.x), self.grid(world.y))
    }

    pub(crate) fn pan_frame(&mut self, pan: &PanGesture, client: Point) -> Vec<Action> {
        self.camera = pan.apply(&self.camera, self.viewport.to_canvas(client));
        vec![Action::CameraChanged(self.camera), Action::RenderNeeded]
    }

    pub(crate) fn zoom_drag_frame(&mut self, zoom: &ZoomDragGesture, client: Point) -> Vec<Action> {
        self.camera = zoom.apply(self.viewport.to_canvas(client));
        vec![Action::CameraChanged(self.camera), Action::RenderNeeded]
    }

    pub(crate) fn rubber_band_frame(&mut self, start_world: Point, client: Point) -> Vec<Action> {
        self.ui.marquee = Some(Rect::from_corners(start_world, self.client_to_world(client)));
        vec![Action::RenderNeeded]
    }

    /// Remove every connection passing within the cut tolerance of the pointer.
    pub(crate) fn cut_frame(&mut self, client: Point) -> Vec<Action> {
        let world = self.client_to_world(client);
        let tolerance = self.camera.screen_dist_to_world(CUT_TOLERANCE_PX);
        let mut actions = Vec::new();
        while let Some(id) = hit::connection_near(&self.doc, &self.kinds, world, tolerance, None) {
            let removed = self.disconnect(&id);
            if removed.is_empty() {
                break;
            }
            actions.extend(removed);
        }
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Select every node whose effective box intersects the band.
    pub(crate) fn end_rubber_band(&mut self, start_world: Point, client: Point, additive: bool) -> Vec<Action> {
        let band = Rect::from_corners(start_world, self.client_to_world(client));
        let hits: Vec<_> =
            self.doc.nodes_bottom_up().filter(|n| hit::effective_rect(n).intersects(&band)).map(|n| n.id).collect();

        let mut selection = if additive { self.ui.selected.clone() } else { Vec::new() };
        for id in &hits {
            if !selection.contains(id) {
                selection.push(*id);
            }
        }
        let mut actions = Vec::new();
        actions.extend(self.clear_highlights(&hits));
        actions.extend(self.set_selection(selection));
        actions
    }

    // --- Touch ---

    /// Touches began; `touches` holds every active touch point in client space.
    pub fn on_touch_start(&mut self, touches: &[Point]) -> Vec<Action> {
        match touches {
            [a, b, ..] => {
                if matches!(self.gesture, Gesture::Idle | Gesture::Panning(_)) {
                    let (a, b) = (self.viewport.to_canvas(*a), self.viewport.to_canvas(*b));
                    self.begin_gesture(Gesture::Pinching(PinchGesture::begin(&self.camera, a, b)));
                }
                Vec::new()
            }
            [only] if self.gesture.is_idle() => {
                self.ui.last_pointer = Some(*only);
                let canvas = self.viewport.to_canvas(*only);
                self.begin_gesture(Gesture::Panning(PanGesture::begin(&self.camera, canvas)));
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    pub fn on_touch_move(&mut self, touches: &[Point]) -> Vec<Action> {
        match (&self.gesture, touches) {
            (Gesture::Pinching(pinch), [a, b, ..]) => {
                self.camera = pinch.apply(self.viewport.to_canvas(*a), self.viewport.to_canvas(*b));
                vec![Action::CameraChanged(self.camera), Action::RenderNeeded]
            }
            (Gesture::Panning(_), [_, _, ..]) => self.on_touch_start(touches),
            (Gesture::Panning(pan), [only]) => {
                let pan = *pan;
                self.pan_frame(&pan, *only)
            }
            _ => Vec::new(),
        }
    }

    /// Touches ended; `remaining` holds the touches still down.
    pub fn on_touch_end(&mut self, remaining: &[Point]) -> Vec<Action> {
        let ends = match self.gesture {
            Gesture::Pinching(_) => remaining.len() < 2,
            Gesture::Panning(_) => remaining.is_empty(),
            _ => false,
        };
        if !ends {
            return Vec::new();
        }
        tracing::debug!(gesture = self.gesture.name(), "touch gesture ended");
        self.gesture = Gesture::Idle;
        self.ui.clear_transient();
        vec![Action::RenderNeeded]
    }

    // --- Wheel ---

    /// Wheel or trackpad scroll: zoom around the pointer.
    pub fn on_wheel(&mut self, client: Point, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.keys.sync(modifiers);
        self.ui.last_pointer = Some(client);
        self.camera = self.camera.wheel_zoom(delta.dy, self.viewport.to_canvas(client));
        vec![Action::CameraChanged(self.camera), Action::RenderNeeded]
    }
}
