#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// Loading
// =============================================================

#[test]
fn empty_object_gives_defaults() {
    let config = EngineConfig::from_json("{}").unwrap();
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.grid_size, GRID_SIZE);
    assert!(config.smart_guides);
    assert!(!config.grid_snap);
}

#[test]
fn fields_override_defaults() {
    let json = r#"{
        "grid_snap": true,
        "grid_size": 10,
        "instant_delete": true,
        "quick_slots": ["text", null, "image"],
        "creation_bindings": [
            { "tool": "selection", "tier": "shift", "code": "KeyN", "kind": "chat" }
        ]
    }"#;
    let config = EngineConfig::from_json(json).unwrap();
    assert!(config.grid_snap);
    assert_eq!(config.grid_size, 10.0);
    assert!(config.instant_delete);
    assert_eq!(config.quick_slot(0), Some("text"));
    assert_eq!(config.quick_slot(1), None);
    assert_eq!(config.quick_slot(2), Some("image"));
    assert_eq!(config.quick_slot(8), None);
    assert_eq!(config.creation_bindings.len(), 1);
}

#[test]
fn malformed_json_is_parse_error() {
    assert!(matches!(EngineConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
}

// =============================================================
// Validation
// =============================================================

#[test]
fn rejects_non_positive_grid() {
    let err = EngineConfig::from_json(r#"{"grid_size": 0}"#).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidGridSize(g) if g == 0.0));
}

#[test]
fn rejects_negative_threshold() {
    let err = EngineConfig::from_json(r#"{"snap_threshold_px": -1}"#).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidSnapThreshold(_)));
}

#[test]
fn rejects_too_many_quick_slots() {
    let slots = vec![Some("text".to_owned()); MAX_QUICK_SLOTS + 1];
    let config = EngineConfig { quick_slots: slots, ..EngineConfig::default() };
    assert!(matches!(config.validate(), Err(ConfigError::TooManyQuickSlots { count: 10, max: 9 })));
}

#[test]
fn rejects_localized_key_values() {
    let err = EngineConfig::from_json(r#"{"creation_bindings": [{"code": "t", "kind": "text"}]}"#).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidKeyCode(ref c) if c == "t"));
    assert!(err.to_string().contains("invalid key code"));
}

// =============================================================
// Lookups
// =============================================================

#[test]
fn snap_threshold_scales_with_zoom() {
    let config = EngineConfig::default();
    assert_eq!(config.snap_threshold_world(2.0), 4.0);
    assert_eq!(config.snap_threshold_world(0.5), 16.0);
    assert_eq!(config.snap_threshold_world(f64::NAN), SNAP_THRESHOLD_PX);
}

#[test]
fn default_bindings_cover_tiers() {
    let config = EngineConfig::default();
    assert_eq!(config.creation_kind(Tool::Edit, ModifierTier::Plain, "KeyT"), Some("text"));
    assert_eq!(config.creation_kind(Tool::Edit, ModifierTier::Shift, "KeyT"), Some("character"));
    assert_eq!(config.creation_kind(Tool::Edit, ModifierTier::CtrlShift, "KeyR"), Some("reroute"));
    assert_eq!(config.creation_kind(Tool::Edit, ModifierTier::Plain, "KeyR"), None);
}

#[test]
fn tool_scoped_binding_wins() {
    let mut config = EngineConfig::default();
    config.creation_bindings.push(CreationBinding {
        tool: Some(Tool::Selection),
        tier: ModifierTier::Plain,
        code: "KeyT".to_owned(),
        kind: "chat".to_owned(),
    });
    assert_eq!(config.creation_kind(Tool::Selection, ModifierTier::Plain, "KeyT"), Some("chat"));
    assert_eq!(config.creation_kind(Tool::Edit, ModifierTier::Plain, "KeyT"), Some("text"));
}
