//! End-to-end interaction scenarios driven through the public engine API.
#![allow(clippy::float_cmp)]

use nodecanvas::camera::{Camera, Point};
use nodecanvas::doc::{Connection, Group, Node, NodeId, ValueType};
use nodecanvas::engine::{Action, EngineCore};
use nodecanvas::hit::{self, Rect};
use nodecanvas::input::{Button, Modifiers};
use nodecanvas::kinds::Typed;
use nodecanvas::snap::GuideOrientation;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn none() -> Modifiers {
    Modifiers::default()
}

fn drag_node(engine: &mut EngineCore, id: NodeId, path: &[Point]) -> Vec<Action> {
    let Some((first, rest)) = path.split_first() else {
        return Vec::new();
    };
    engine.on_node_pointer_down(id, *first, Button::Primary, none());
    let mut last = *first;
    for p in rest {
        engine.on_pointer_move(*p, none());
        last = *p;
    }
    engine.on_pointer_up(last, Button::Primary, none())
}

fn connect(engine: &mut EngineCore, from: NodeId, to: Point) -> Vec<Action> {
    engine.on_output_handle_down(from, None, pt(0.0, 0.0));
    engine.on_pointer_move(to, none());
    engine.on_pointer_up(to, Button::Primary, none())
}

fn connections_created(actions: &[Action]) -> usize {
    actions.iter().filter(|a| matches!(a, Action::ConnectionCreated(_))).count()
}

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
}

/// Every group's box equals the bounding box of its members' effective boxes.
fn assert_group_bounds(engine: &EngineCore) {
    for group in engine.doc.groups() {
        let members = group.node_ids.iter().filter_map(|id| engine.doc.node(id)).map(hit::effective_rect);
        let Some(expected) = Rect::union_all(members) else {
            panic!("group {} has no live members", group.id);
        };
        assert_eq!(group.rect(), expected, "group {} bounds are stale", group.title);
    }
}

// =============================================================
// Scenario A: smart guide snap
// =============================================================

#[test]
fn dragged_edge_snaps_to_neighbour_edge() {
    let mut engine = EngineCore::new();
    let left = Node::new("text", pt(0.0, 0.0), 100.0, 50.0);
    let right = Node::new("text", pt(200.0, 0.0), 100.0, 50.0);
    let rid = right.id;
    engine.load_graph(vec![left, right], Vec::new(), Vec::new());

    engine.on_node_pointer_down(rid, pt(210.0, 10.0), Button::Primary, none());
    engine.on_pointer_move(pt(114.0, 10.0), none());

    assert_eq!(engine.node(&rid).map(|n| n.position.x), Some(100.0));
    assert!(
        engine
            .ui
            .guides
            .iter()
            .any(|g| g.orientation == GuideOrientation::Vertical && g.position == 100.0)
    );
}

// =============================================================
// Scenario B: topmost group wins the drop
// =============================================================

#[test]
fn drop_over_two_groups_joins_the_topmost() {
    let mut engine = EngineCore::new();
    engine.config.smart_guides = false;
    let a = Node::new("text", pt(0.0, 0.0), 100.0, 100.0);
    let b = Node::new("text", pt(150.0, 0.0), 100.0, 100.0);
    let moving = Node::new("text", pt(0.0, 400.0), 100.0, 100.0);
    let (aid, bid, mid) = (a.id, b.id, moving.id);
    let lower = Group::new("lower", [aid, mid]);
    let upper = Group::new("upper", [bid]);
    let (lower_id, upper_id) = (lower.id, upper.id);
    engine.load_graph(vec![a, b, moving], Vec::new(), vec![lower, upper]);

    drag_node(&mut engine, mid, &[pt(10.0, 410.0), pt(50.0, 200.0), pt(85.0, 10.0)]);

    assert!(engine.doc.group(&upper_id).is_some_and(|g| g.node_ids.contains(&mid)));
    assert!(engine.doc.group(&lower_id).is_some_and(|g| !g.node_ids.contains(&mid)));
    assert_group_bounds(&engine);
}

// =============================================================
// Scenario C: typed connections
// =============================================================

#[test]
fn text_output_only_connects_to_text_inputs() {
    let mut engine = EngineCore::new();
    engine.kinds_mut().register("upscaler", Typed::new(Some(ValueType::Image), &[ValueType::Image]));
    let source = Node::new("text", pt(0.0, 0.0), 100.0, 50.0);
    let image_only = Node::new("upscaler", pt(300.0, 0.0), 200.0, 100.0);
    let text_in = Node::new("prompt", pt(300.0, 300.0), 200.0, 100.0);
    let untyped = Node::new("note", pt(300.0, 600.0), 200.0, 100.0);
    let sid = source.id;
    engine.load_graph(vec![source, image_only, text_in, untyped], Vec::new(), Vec::new());

    assert_eq!(connections_created(&connect(&mut engine, sid, pt(400.0, 50.0))), 0);
    assert_eq!(connections_created(&connect(&mut engine, sid, pt(400.0, 350.0))), 1);
    assert_eq!(connections_created(&connect(&mut engine, sid, pt(400.0, 650.0))), 1);
    assert_eq!(engine.doc.connections().len(), 2);
}

// =============================================================
// Scenario D: reroute split
// =============================================================

#[test]
fn reroute_dropped_on_path_splits_connection() {
    let mut engine = EngineCore::new();
    let a = Node::new("image", pt(0.0, 0.0), 200.0, 200.0);
    let b = Node::new("video", pt(600.0, 0.0), 240.0, 200.0);
    let r = Node::new("reroute", pt(300.0, 600.0), 24.0, 24.0);
    let (aid, bid, rid) = (a.id, b.id, r.id);
    let original = Connection::new(aid, None, bid, None);
    engine.load_graph(vec![a, b, r], vec![original.clone()], Vec::new());

    // Output anchor (200, 100), input anchor (600, 100); centre the reroute at (400, 100).
    let actions = drag_node(&mut engine, rid, &[pt(312.0, 612.0), pt(350.0, 300.0), pt(400.0, 100.0)]);

    assert!(actions.contains(&Action::ConnectionRemoved(original.id)));
    let pairs: Vec<(NodeId, NodeId)> = engine.doc.connections().iter().map(|c| (c.from_node, c.to_node)).collect();
    assert!(pairs.contains(&(aid, rid)));
    assert!(pairs.contains(&(rid, bid)));
    assert!(!pairs.contains(&(aid, bid)));
    assert_eq!(engine.node(&rid).and_then(|n| n.value_type), Some(ValueType::Image));
}

// =============================================================
// Properties
// =============================================================

#[test]
fn zoom_keeps_pivot_fixed_and_clamps() {
    let cameras = [
        Camera::default(),
        Camera { pan_x: 120.0, pan_y: -40.0, zoom: 0.5 },
        Camera { pan_x: -900.0, pan_y: 310.0, zoom: 1.7 },
    ];
    let pivots = [pt(0.0, 0.0), pt(400.0, 300.0), pt(-25.0, 812.5)];
    for camera in cameras {
        for pivot in pivots {
            for target in [0.01, 0.1, 0.35, 1.0, 1.99, 2.0, 50.0] {
                let zoomed = camera.zoom_at(target, pivot);
                assert!((0.1..=2.0).contains(&zoomed.zoom));
                assert!(close(camera.screen_to_world(pivot), zoomed.screen_to_world(pivot)));
            }
        }
    }
}

#[test]
fn multi_drag_is_independent_of_frame_count() {
    let build = || {
        let mut engine = EngineCore::new();
        engine.config.grid_snap = true;
        let nodes = vec![
            Node::new("text", pt(0.0, 0.0), 100.0, 50.0),
            Node::new("text", pt(140.0, 60.0), 100.0, 50.0),
            Node::new("text", pt(-80.0, 220.0), 100.0, 50.0),
        ];
        let ids: Vec<NodeId> = nodes.iter().map(|n| n.id).collect();
        engine.load_graph(nodes, Vec::new(), Vec::new());
        engine.ui.selected = ids.clone();
        (engine, ids)
    };

    let (mut smooth, ids) = build();
    let path: Vec<Point> = (0..=40).map(|i| pt(5.0 + f64::from(i) * 9.7, 5.0 + f64::from(i) * 4.1)).collect();
    drag_node(&mut smooth, ids[0], &path);

    let (mut jump, jump_ids) = build();
    let end = path[path.len() - 1];
    drag_node(&mut jump, jump_ids[0], &[pt(5.0, 5.0), end]);

    let smooth_positions: Vec<Point> = ids.iter().filter_map(|id| smooth.node(id).map(|n| n.position)).collect();
    let jump_positions: Vec<Point> = jump_ids.iter().filter_map(|id| jump.node(id).map(|n| n.position)).collect();
    assert_eq!(smooth_positions.len(), 3);
    for (s, j) in smooth_positions.iter().zip(&jump_positions) {
        assert_eq!(s, j);
    }
    assert_eq!(smooth_positions[0], pt(380.0, 160.0));
}

#[test]
fn connections_stay_unique() {
    let mut engine = EngineCore::new();
    let a = Node::new("text", pt(0.0, 0.0), 100.0, 50.0);
    let b = Node::new("prompt", pt(300.0, 0.0), 200.0, 100.0);
    let (aid, bid) = (a.id, b.id);
    engine.load_graph(vec![a, b], Vec::new(), Vec::new());

    for _ in 0..5 {
        engine.apply_connection_added(Connection::new(aid, None, bid, None));
        connect(&mut engine, aid, pt(400.0, 50.0));
    }
    engine.apply_connection_added(Connection::new(aid, None, bid, Some("context".to_owned())));
    assert_eq!(engine.doc.connections().len(), 2);
}

#[test]
fn group_bounds_hold_after_mixed_edits() {
    let mut engine = EngineCore::new();
    engine.config.smart_guides = false;
    let a = Node::new("text", pt(0.0, 0.0), 150.0, 80.0);
    let b = Node::new("image", pt(300.0, 50.0), 200.0, 200.0);
    let c = Node::new("text", pt(900.0, 900.0), 150.0, 80.0);
    let (aid, bid, cid) = (a.id, b.id, c.id);
    let group = Group::new("g", [aid, bid]);
    let gid = group.id;
    engine.load_graph(vec![a, b, c], Vec::new(), vec![group]);

    drag_node(&mut engine, aid, &[pt(10.0, 10.0), pt(-90.0, 210.0)]);
    assert_group_bounds(&engine);

    engine.on_resize_handle_down(bid, nodecanvas::drag::ResizeAnchor::Se, pt(500.0, 250.0));
    engine.on_pointer_move(pt(640.0, 400.0), none());
    engine.on_pointer_up(pt(640.0, 400.0), Button::Primary, none());
    assert_group_bounds(&engine);

    engine.ui.selected = vec![aid, cid];
    engine.group_nodes(&[aid, cid]);
    assert_group_bounds(&engine);
    assert!(engine.doc.group(&gid).is_some_and(|g| g.node_ids.len() == 1));

    engine.apply_node_removed(&bid);
    assert!(engine.doc.group(&gid).is_none());
    assert_group_bounds(&engine);
}

#[test]
fn undo_redo_round_trip_is_bounded() {
    let mut engine = EngineCore::new();
    let a = Node::new("text", pt(0.0, 0.0), 100.0, 50.0);
    let aid = a.id;
    engine.load_graph(vec![a], Vec::new(), Vec::new());

    for step in 1..=8 {
        engine.take_snapshot();
        engine.doc.set_position(&aid, pt(f64::from(step) * 10.0, 0.0));
    }
    assert_eq!(engine.history.past_len(), 5);

    engine.undo();
    assert_eq!(engine.node(&aid).map(|n| n.position), Some(pt(70.0, 0.0)));
    engine.redo();
    assert_eq!(engine.node(&aid).map(|n| n.position), Some(pt(80.0, 0.0)));

    while !engine.undo().is_empty() {}
    assert_eq!(engine.node(&aid).map(|n| n.position), Some(pt(30.0, 0.0)));
    assert!(engine.history.future_len() <= 5);
}
