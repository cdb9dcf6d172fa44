//! Per-node-kind capabilities.
//!
//! The controllers never branch on a node's kind string. Everything that
//! differs between kinds (minimum size, the value type an output emits, and
//! which input handle a dropped connection lands on) is asked of the
//! [`NodeBehavior`] registered for that kind. Adding a node kind means
//! registering a behavior; the drag and connection code stay untouched.

#[cfg(test)]
#[path = "kinds_test.rs"]
mod kinds_test;

use std::collections::HashMap;
use std::fmt::Debug;

use crate::camera::Point;
use crate::consts::{DEFAULT_MIN_HEIGHT, DEFAULT_MIN_WIDTH};
use crate::doc::{Node, ValueType};
use crate::hit::{self, Rect};

/// Handle id of the upper input on a two-image node.
pub const IMAGE_INPUT_1: &str = "image-1";
/// Handle id of the lower input on a two-image node.
pub const IMAGE_INPUT_2: &str = "image-2";

/// Outcome of asking a node where a dropped connection attaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetResolution {
    /// Attach to this input handle (`None` = the default handle).
    Accept(Option<String>),
    Reject,
}

/// Everything a behavior may consult when resolving a connection target.
#[derive(Debug, Clone, Copy)]
pub struct TargetQuery<'a> {
    pub node: &'a Node,
    /// The node's effective box in world space.
    pub bounds: Rect,
    /// Pointer position in world space.
    pub pointer: Point,
    /// Value type emitted by the source handle, if known.
    pub from_type: Option<ValueType>,
    /// Connections already feeding this node.
    pub existing_inputs: usize,
    /// The user is holding the force-replace modifier.
    pub force_replace: bool,
}

/// Capabilities of one node kind.
pub trait NodeBehavior: Debug {
    /// Smallest width and height a resize may produce.
    fn min_size(&self) -> (f64, f64) {
        (DEFAULT_MIN_WIDTH, DEFAULT_MIN_HEIGHT)
    }

    /// Value type flowing out of `handle` on `node`.
    fn output_type(&self, node: &Node, handle: Option<&str>) -> Option<ValueType>;

    /// Which input handle a connection dropped at `query.pointer` attaches to.
    fn resolve_target(&self, query: &TargetQuery<'_>) -> TargetResolution;

    /// Pass-through nodes that split connections when dropped on them.
    fn is_reroute(&self) -> bool {
        false
    }

    /// Where a connection into `handle` meets the node's effective box.
    fn input_anchor(&self, bounds: Rect, _handle: Option<&str>) -> Point {
        Point::new(bounds.x, bounds.center().y)
    }
}

fn type_matches(accepts: &[ValueType], from_type: Option<ValueType>) -> bool {
    match from_type {
        None => true,
        Some(t) => accepts.is_empty() || accepts.contains(&t),
    }
}

/// A node with outputs and no inputs.
#[derive(Debug, Clone, Copy)]
pub struct Source {
    pub output: ValueType,
}

impl NodeBehavior for Source {
    fn output_type(&self, _node: &Node, _handle: Option<&str>) -> Option<ValueType> {
        Some(self.output)
    }

    fn resolve_target(&self, _query: &TargetQuery<'_>) -> TargetResolution {
        TargetResolution::Reject
    }
}

/// A node with a single default input accepting a fixed set of value types.
///
/// An empty `accepts` list takes any type.
#[derive(Debug, Clone)]
pub struct Typed {
    pub output: Option<ValueType>,
    pub accepts: Vec<ValueType>,
    pub min_size: (f64, f64),
}

impl Typed {
    #[must_use]
    pub fn new(output: Option<ValueType>, accepts: &[ValueType]) -> Self {
        Self { output, accepts: accepts.to_vec(), min_size: (DEFAULT_MIN_WIDTH, DEFAULT_MIN_HEIGHT) }
    }

    #[must_use]
    pub fn with_min_size(mut self, width: f64, height: f64) -> Self {
        self.min_size = (width, height);
        self
    }
}

impl NodeBehavior for Typed {
    fn min_size(&self) -> (f64, f64) {
        self.min_size
    }

    fn output_type(&self, _node: &Node, _handle: Option<&str>) -> Option<ValueType> {
        self.output
    }

    fn resolve_target(&self, query: &TargetQuery<'_>) -> TargetResolution {
        if type_matches(&self.accepts, query.from_type) {
            TargetResolution::Accept(None)
        } else {
            TargetResolution::Reject
        }
    }
}

/// An editor taking two image inputs stacked vertically.
///
/// The drop lands on whichever half of the node the pointer is over.
#[derive(Debug, Clone, Copy, Default)]
pub struct DualImage;

impl NodeBehavior for DualImage {
    fn min_size(&self) -> (f64, f64) {
        (240.0, 200.0)
    }

    fn output_type(&self, _node: &Node, _handle: Option<&str>) -> Option<ValueType> {
        Some(ValueType::Image)
    }

    fn resolve_target(&self, query: &TargetQuery<'_>) -> TargetResolution {
        if !type_matches(&[ValueType::Image], query.from_type) {
            return TargetResolution::Reject;
        }
        let handle = if query.pointer.y < query.bounds.center().y { IMAGE_INPUT_1 } else { IMAGE_INPUT_2 };
        TargetResolution::Accept(Some(handle.to_owned()))
    }

    fn input_anchor(&self, bounds: Rect, handle: Option<&str>) -> Point {
        let fraction = match handle {
            Some(IMAGE_INPUT_1) => 0.25,
            Some(IMAGE_INPUT_2) => 0.75,
            _ => 0.5,
        };
        Point::new(bounds.x, bounds.y + bounds.height * fraction)
    }
}

/// A pass-through point used to route connections.
///
/// Accepts any value type but only one input, unless the user forces a
/// replacement. Its output carries whatever type was last routed into it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reroute;

impl NodeBehavior for Reroute {
    fn min_size(&self) -> (f64, f64) {
        (24.0, 24.0)
    }

    fn output_type(&self, node: &Node, _handle: Option<&str>) -> Option<ValueType> {
        node.value_type
    }

    fn resolve_target(&self, query: &TargetQuery<'_>) -> TargetResolution {
        if query.existing_inputs > 0 && !query.force_replace {
            return TargetResolution::Reject;
        }
        TargetResolution::Accept(None)
    }

    fn is_reroute(&self) -> bool {
        true
    }
}

/// Behavior for kinds nobody registered: untyped output, accepts anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Permissive;

impl NodeBehavior for Permissive {
    fn output_type(&self, _node: &Node, _handle: Option<&str>) -> Option<ValueType> {
        None
    }

    fn resolve_target(&self, _query: &TargetQuery<'_>) -> TargetResolution {
        TargetResolution::Accept(None)
    }
}

/// Registry from kind string to behavior.
#[derive(Debug)]
pub struct NodeKinds {
    behaviors: HashMap<String, Box<dyn NodeBehavior>>,
    fallback: Box<dyn NodeBehavior>,
}

impl Default for NodeKinds {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl NodeKinds {
    /// A registry with no kinds; every node resolves to the permissive fallback.
    #[must_use]
    pub fn empty() -> Self {
        Self { behaviors: HashMap::new(), fallback: Box::new(Permissive) }
    }

    /// The built-in node kinds.
    #[must_use]
    pub fn with_defaults() -> Self {
        use ValueType::{Audio, Character, Image, Text, Video};

        let mut kinds = Self::empty();
        kinds.register("text", Source { output: Text });
        kinds.register("character", Source { output: Character });
        kinds.register("prompt", Typed::new(Some(Text), &[Text, Image]));
        kinds.register("chat", Typed::new(Some(Text), &[Text, Image, Character]).with_min_size(280.0, 240.0));
        kinds.register("image", Typed::new(Some(Image), &[Text, Image]).with_min_size(200.0, 200.0));
        kinds.register("video", Typed::new(Some(Video), &[Text, Image]).with_min_size(240.0, 180.0));
        kinds.register("audio", Typed::new(Some(Audio), &[Text]));
        kinds.register("image-editor", DualImage);
        kinds.register("reroute", Reroute);
        kinds
    }

    /// Register (or replace) the behavior for `kind`.
    pub fn register(&mut self, kind: impl Into<String>, behavior: impl NodeBehavior + 'static) {
        self.behaviors.insert(kind.into(), Box::new(behavior));
    }

    #[must_use]
    pub fn is_registered(&self, kind: &str) -> bool {
        self.behaviors.contains_key(kind)
    }

    /// Behavior for `kind`, falling back to [`Permissive`].
    #[must_use]
    pub fn behavior(&self, kind: &str) -> &dyn NodeBehavior {
        match self.behaviors.get(kind) {
            Some(behavior) => behavior.as_ref(),
            None => self.fallback.as_ref(),
        }
    }

    #[must_use]
    pub fn min_size(&self, node: &Node) -> (f64, f64) {
        self.behavior(&node.kind).min_size()
    }

    #[must_use]
    pub fn output_type(&self, node: &Node, handle: Option<&str>) -> Option<ValueType> {
        self.behavior(&node.kind).output_type(node, handle)
    }

    #[must_use]
    pub fn is_reroute(&self, node: &Node) -> bool {
        self.behavior(&node.kind).is_reroute()
    }

    #[must_use]
    pub fn input_anchor(&self, node: &Node, handle: Option<&str>) -> Point {
        self.behavior(&node.kind).input_anchor(hit::effective_rect(node), handle)
    }

    #[must_use]
    pub fn resolve_target(&self, query: &TargetQuery<'_>) -> TargetResolution {
        self.behavior(&query.node.kind).resolve_target(query)
    }
}
