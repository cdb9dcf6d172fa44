use uuid::Uuid;

use super::*;

fn handle(node_id: NodeId, handle_id: Option<&str>) -> HandleHit {
    HandleHit { node_id, handle_id: handle_id.map(str::to_owned), declared_type: Some(ValueType::Text) }
}

#[test]
fn empty_registry_finds_nothing() {
    let reg = HitRegistry::new();
    let p = Point::new(5.0, 5.0);
    assert!(reg.is_empty());
    assert!(reg.input_handle_at(p).is_none());
    assert!(reg.dock_zone_at(p).is_none());
    assert!(!reg.is_over_chrome(p));
}

#[test]
fn input_handle_found_inside_rect() {
    let id = Uuid::new_v4();
    let mut reg = HitRegistry::new();
    reg.register_input_handle(Rect::new(0.0, 0.0, 10.0, 10.0), handle(id, Some("in")));
    let hit = reg.input_handle_at(Point::new(5.0, 5.0)).unwrap();
    assert_eq!(hit.node_id, id);
    assert_eq!(hit.handle_id.as_deref(), Some("in"));
    assert!(reg.input_handle_at(Point::new(15.0, 5.0)).is_none());
}

#[test]
fn later_regions_cover_earlier_ones() {
    let below = Uuid::new_v4();
    let above = Uuid::new_v4();
    let mut reg = HitRegistry::new();
    reg.register_input_handle(Rect::new(0.0, 0.0, 20.0, 20.0), handle(below, None));
    reg.register_input_handle(Rect::new(5.0, 5.0, 20.0, 20.0), handle(above, None));
    assert_eq!(reg.input_handle_at(Point::new(10.0, 10.0)).unwrap().node_id, above);
    assert_eq!(reg.input_handle_at(Point::new(1.0, 1.0)).unwrap().node_id, below);
}

#[test]
fn chrome_over_handle_hides_handle() {
    let mut reg = HitRegistry::new();
    reg.register_input_handle(Rect::new(0.0, 0.0, 20.0, 20.0), handle(Uuid::new_v4(), None));
    reg.register_chrome(Rect::new(0.0, 0.0, 100.0, 40.0));
    let p = Point::new(10.0, 10.0);
    assert!(reg.input_handle_at(p).is_none());
    assert!(reg.is_over_chrome(p));
}

#[test]
fn dock_zone_lookup_and_counts_as_chrome() {
    let mut reg = HitRegistry::new();
    reg.register_dock_zone(Rect::new(100.0, 0.0, 50.0, 50.0), DockMode::Fullscreen);
    let p = Point::new(120.0, 20.0);
    assert_eq!(reg.dock_zone_at(p), Some(DockMode::Fullscreen));
    assert!(reg.is_over_chrome(p));
}

#[test]
fn remove_node_drops_only_its_handles() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut reg = HitRegistry::new();
    reg.register_input_handle(Rect::new(0.0, 0.0, 10.0, 10.0), handle(a, None));
    reg.register_input_handle(Rect::new(20.0, 0.0, 10.0, 10.0), handle(b, None));
    reg.register_chrome(Rect::new(50.0, 0.0, 10.0, 10.0));
    reg.remove_node(&a);
    assert_eq!(reg.len(), 2);
    assert!(reg.input_handle_at(Point::new(5.0, 5.0)).is_none());
    reg.clear();
    assert!(reg.is_empty());
}
