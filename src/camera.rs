//! Viewport transform: camera state, coordinate conversions and zoom math.
//!
//! Three coordinate spaces are in play. *Client* space is what the browser
//! reports for pointer events. *Canvas* space is client space relative to the
//! canvas element's top-left corner ([`Viewport::to_canvas`]). *World* space is
//! where nodes live; the [`Camera`] maps canvas space to world space via
//! `world = (canvas - pan) / zoom`.
//!
//! Every conversion degrades to a safe value instead of propagating NaN, so a
//! corrupted persisted camera cannot poison later frames.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ZOOM, MIN_PINCH_DISTANCE_PX, MIN_ZOOM, WHEEL_ZOOM_BASE, ZOOM_DRAG_BASE};

/// A point in client, canvas or world space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

/// Clamp a requested zoom into `[MIN_ZOOM, MAX_ZOOM]`. NaN maps to `1.0`.
#[must_use]
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() { 1.0 } else { zoom.clamp(MIN_ZOOM, MAX_ZOOM) }
}

/// Camera state for pan/zoom on the infinite canvas.
///
/// `pan_x` / `pan_y` are the canvas-space translation in CSS pixels.
/// `zoom` is the scale factor (1.0 = no zoom), kept within `[MIN_ZOOM, MAX_ZOOM]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    #[must_use]
    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    /// Whether every field is finite and the zoom is positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.pan_x.is_finite() && self.pan_y.is_finite() && self.zoom.is_finite() && self.zoom > 0.0
    }

    /// This camera, or the identity camera if this one is corrupt.
    #[must_use]
    pub fn sanitized(self) -> Self {
        if self.is_valid() {
            return self;
        }
        tracing::warn!(pan_x = self.pan_x, pan_y = self.pan_y, zoom = self.zoom, "corrupt camera replaced with identity");
        Self::default()
    }

    /// Convert a canvas-space point to world coordinates.
    ///
    /// Returns the world origin when the camera is corrupt.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        if !self.is_valid() {
            return Point::ZERO;
        }
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a world-space point to canvas coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        if !self.is_valid() {
            return Point::ZERO;
        }
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to world-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        if self.is_valid() { screen_dist / self.zoom } else { screen_dist }
    }

    /// Zoom to `new_zoom` while keeping the world point under `pivot` (canvas space) fixed.
    #[must_use]
    pub fn zoom_at(self, new_zoom: f64, pivot: Point) -> Self {
        let current = self.sanitized();
        let zoom = clamp_zoom(new_zoom);
        let anchor = current.screen_to_world(pivot);
        Self { pan_x: pivot.x - anchor.x * zoom, pan_y: pivot.y - anchor.y * zoom, zoom }
    }

    /// Exponential wheel zoom around `pivot`; positive `delta_y` zooms out.
    #[must_use]
    pub fn wheel_zoom(self, delta_y: f64, pivot: Point) -> Self {
        let current = self.sanitized();
        let factor = WHEEL_ZOOM_BASE.powf(-delta_y);
        current.zoom_at(current.zoom * factor, pivot)
    }
}

/// The canvas element's placement in client space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Client-space top-left corner of the canvas element.
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Convert a client-space point to canvas space.
    #[must_use]
    pub fn to_canvas(&self, client: Point) -> Point {
        client - self.origin
    }

    /// Canvas-space center of the viewport.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }

    /// Camera that centers the world origin at zoom 1; used to recover from corruption.
    #[must_use]
    pub fn recovery_camera(&self) -> Camera {
        let center = self.center();
        if center.is_finite() {
            Camera { pan_x: center.x, pan_y: center.y, zoom: 1.0 }
        } else {
            Camera::default()
        }
    }
}

/// Drag-to-pan state, captured at pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanGesture {
    pub start_screen: Point,
    pub start_pan: Point,
}

impl PanGesture {
    #[must_use]
    pub fn begin(camera: &Camera, screen: Point) -> Self {
        let camera = camera.sanitized();
        Self { start_screen: screen, start_pan: camera.pan() }
    }

    /// Camera after the pointer moved to `screen`.
    #[must_use]
    pub fn apply(&self, camera: &Camera, screen: Point) -> Camera {
        let pan = self.start_pan + (screen - self.start_screen);
        Camera { pan_x: pan.x, pan_y: pan.y, zoom: camera.sanitized().zoom }
    }
}

/// Two-finger pinch state.
///
/// The world point under the starting pinch center is pinned to the *current*
/// center every frame, so the canvas follows the fingers while it zooms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchGesture {
    pub start_distance: f64,
    pub start_zoom: f64,
    pub anchor_world: Point,
}

impl PinchGesture {
    #[must_use]
    pub fn begin(camera: &Camera, a: Point, b: Point) -> Self {
        let camera = camera.sanitized();
        Self {
            start_distance: a.distance(b),
            start_zoom: camera.zoom,
            anchor_world: camera.screen_to_world(a.midpoint(b)),
        }
    }

    #[must_use]
    pub fn apply(&self, a: Point, b: Point) -> Camera {
        let ratio = if self.start_distance < MIN_PINCH_DISTANCE_PX {
            1.0
        } else {
            a.distance(b) / self.start_distance
        };
        let zoom = clamp_zoom(self.start_zoom * ratio);
        let center = a.midpoint(b);
        Camera { pan_x: center.x - self.anchor_world.x * zoom, pan_y: center.y - self.anchor_world.y * zoom, zoom }
    }
}

/// Horizontal drag-to-zoom anchored at the press point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomDragGesture {
    pub start_screen: Point,
    pub start_zoom: f64,
    pub anchor_world: Point,
}

impl ZoomDragGesture {
    #[must_use]
    pub fn begin(camera: &Camera, screen: Point) -> Self {
        let camera = camera.sanitized();
        Self { start_screen: screen, start_zoom: camera.zoom, anchor_world: camera.screen_to_world(screen) }
    }

    /// Dragging right zooms in, dragging left zooms out.
    #[must_use]
    pub fn apply(&self, screen: Point) -> Camera {
        let dx = screen.x - self.start_screen.x;
        let zoom = clamp_zoom(self.start_zoom * ZOOM_DRAG_BASE.powf(dx));
        Camera {
            pan_x: self.start_screen.x - self.anchor_world.x * zoom,
            pan_y: self.start_screen.y - self.anchor_world.y * zoom,
            zoom,
        }
    }
}
