//! Shared numeric constants for the engine.

// ── Camera ──────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest allowed zoom factor.
pub const MAX_ZOOM: f64 = 2.0;

/// Base of the exponential wheel zoom: `WHEEL_ZOOM_BASE^(-delta_y)`.
pub const WHEEL_ZOOM_BASE: f64 = 1.001;

/// Base of the exponential zoom-drag: `ZOOM_DRAG_BASE^(dx)` per screen pixel.
pub const ZOOM_DRAG_BASE: f64 = 1.005;

/// Pinch distances below this many pixels are ignored as degenerate.
pub const MIN_PINCH_DISTANCE_PX: f64 = 1.0;

// ── Node geometry ───────────────────────────────────────────────

/// Height of a collapsed node's hit box, in world units.
pub const COLLAPSED_HEIGHT: f64 = 40.0;

/// Side length of a docked node's proxy hit box, in world units.
pub const DOCKED_PROXY_SIZE: f64 = 48.0;

/// Fallback minimum node width when a kind does not declare one.
pub const DEFAULT_MIN_WIDTH: f64 = 120.0;

/// Fallback minimum node height when a kind does not declare one.
pub const DEFAULT_MIN_HEIGHT: f64 = 60.0;

/// Fraction of the node size trimmed from each side before testing group overlap.
pub const GROUP_DROP_SHRINK: f64 = 0.05;

// ── Snapping ────────────────────────────────────────────────────

/// Default grid unit in world units.
pub const GRID_SIZE: f64 = 20.0;

/// Smart-guide match distance in screen pixels.
pub const SNAP_THRESHOLD_PX: f64 = 8.0;

/// Extra length added to both ends of a smart guide, in world units.
pub const GUIDE_MARGIN: f64 = 20.0;

// ── Connections ─────────────────────────────────────────────────

/// Padding around a node's effective box when resolving a connection drop, in screen pixels.
pub const CONNECT_TOLERANCE_PX: f64 = 12.0;

/// Distance from a connection path at which a dropped reroute node splits it, in screen pixels.
pub const REROUTE_SPLIT_TOLERANCE_PX: f64 = 15.0;

/// Distance from a connection path at which the cutter removes it, in screen pixels.
pub const CUT_TOLERANCE_PX: f64 = 8.0;

/// Minimum horizontal control-point reach of a connection curve, in world units.
pub const CURVE_MIN_REACH: f64 = 50.0;

/// Line segments used to approximate a connection curve for hit-testing.
pub const CURVE_SAMPLES: usize = 20;

// ── Docking ─────────────────────────────────────────────────────

/// Pointer distance from the canvas top, in pixels, that reveals the dock menu.
pub const DOCK_TOP_THRESHOLD_PX: f64 = 80.0;

/// Pointer distance from the left/right canvas edge, in pixels, that targets a side panel.
pub const DOCK_SIDE_THRESHOLD_PX: f64 = 48.0;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of snapshots kept on each undo/redo stack.
pub const HISTORY_CAPACITY: usize = 5;

// ── Keyboard ────────────────────────────────────────────────────

/// Quick slots bound to `Digit1`..`Digit9`.
pub const MAX_QUICK_SLOTS: usize = 9;
