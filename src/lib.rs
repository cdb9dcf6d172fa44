//! Interaction engine for the node-graph canvas editor.
//!
//! The engine turns raw pointer, touch and keyboard events into graph
//! mutations: panning and zooming the infinite canvas, dragging and resizing
//! nodes and groups with snapping, drawing typed connections between node
//! handles, rubber-band selection, and a bounded undo/redo of node positions.
//! The host application owns the authoritative graph; it mirrors it into the
//! engine and commits the [`engine::Action`]s the engine hands back.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`] snapshot owner and host-facing [`engine::Action`]s |
//! | [`doc`] | Id-keyed node / connection / group store |
//! | [`camera`] | Pan/zoom camera, viewport, coordinate conversions, pinch and zoom-drag math |
//! | [`input`] | Tools, modifiers, key state and the single active [`input::Gesture`] |
//! | [`hit`] | Rectangles, effective node boxes, group bounds, connection proximity |
//! | [`snap`] | Grid snapping and smart alignment guides |
//! | [`drag`] | Node drag, group drag and resize lifecycles |
//! | [`connect`] | Connection drawing and target resolution |
//! | [`gesture`] | Canvas-level mouse, touch and wheel gestures |
//! | [`hotkeys`] | Keyboard shortcut dispatch |
//! | [`align`] | Alignment and distribution of a multi-selection |
//! | [`history`] | Bounded undo/redo of node positions |
//! | [`kinds`] | Per-node-kind capabilities (minimum size, value types, input rules) |
//! | [`probe`] | Renderer-provided hit regions for handles, dock zones and chrome |
//! | [`dom`] | Browser DOM probe and canvas-element wrapper |
//! | [`config`] | Engine configuration |
//! | [`error`] | Error types |
//! | [`consts`] | Shared numeric constants |

pub mod align;
pub mod camera;
pub mod config;
pub mod connect;
pub mod consts;
pub mod doc;
pub mod dom;
pub mod drag;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod hit;
pub mod history;
pub mod hotkeys;
pub mod input;
pub mod kinds;
pub mod probe;
pub mod snap;
