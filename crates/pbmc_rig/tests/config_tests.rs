//! Rig config parsing and loading

use pbmc_control::ControlType;
use pbmc_physics::ColliderShape;
use pbmc_rig::{spawn, ConfigError, Hand, RigConfig, RigError, CONFIG_ENV};

const FULL: &str = r#"
tick_rate = 72.0
ground = false

[physics]
gravity = [0.0, 0.0, -500.0]
timestep = 0.01

[follower]
control_type = "velocity"
linear = { p = 200.0, i = 1.0, d = 20.0, max = 5000.0 }

[grasp]
max_mass = 8.0
weld_fixation = false

[right_hand]
start = [20.0, 0.0, 60.0]
volume_offset = [0.0, 5.0, 0.0]
shape = { type = "capsule", half_height = 4.0, radius = 2.0 }

[[props]]
name = "mug"
mass = 0.4
position = [20.0, 0.0, 5.0]
shape = { type = "box", half_extents = [3.0, 3.0, 5.0] }
"#;

#[test]
fn test_parse_full_file() {
    let config = RigConfig::parse(FULL).unwrap();

    assert_eq!(config.tick_rate, 72.0);
    assert!(!config.ground);
    assert_eq!(config.physics.gravity, [0.0, 0.0, -500.0]);
    // Unset physics fields keep their defaults
    assert_eq!(config.physics.max_substeps, 4);

    assert_eq!(config.follower.control_type, ControlType::Velocity);
    assert_eq!(config.follower.linear.p, 200.0);
    assert_eq!(config.follower.angular.p, 128.0);

    assert_eq!(config.grasp.max_mass, 8.0);
    assert_eq!(config.grasp.max_length, 50.0);
    assert!(!config.grasp.weld_fixation);

    assert_eq!(config.right_hand.shape, ColliderShape::capsule(4.0, 2.0));
    assert_eq!(config.right_hand.volume_offset, [0.0, 5.0, 0.0]);
    assert_eq!(config.left_hand, RigConfig::default().left_hand);

    assert_eq!(config.props.len(), 1);
    assert_eq!(config.props[0].name, "mug");
    assert_eq!(config.props[0].shape, ColliderShape::cuboid(3.0, 3.0, 5.0));
}

#[test]
fn test_rejects_invalid_limits() {
    let cases = [
        "tick_rate = 0.0",
        "[grasp]\nmax_mass = 0.0",
        "[grasp]\nmax_length = -1.0",
        "[physics]\ntimestep = 0.0",
        "[follower]\nlinear = { p = 1.0, i = 0.0, d = 0.0, max = -5.0 }",
        "[left_hand]\nshape = { type = \"sphere\", radius = 0.0 }",
        "[[props]]\nname = \"ghost\"\nmass = -1.0\nposition = [0.0, 0.0, 0.0]\nshape = { type = \"sphere\", radius = 1.0 }",
    ];
    for case in cases {
        let err = RigConfig::parse(case).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "{}: {:?}", case, err);
    }
}

#[test]
fn test_unknown_shape_is_parse_error() {
    let err = RigConfig::parse("[left_hand]\nshape = { type = \"torus\", radius = 1.0 }").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_env_override() {
    let path = std::env::temp_dir().join(format!("pbmc_rig_test_{}.toml", std::process::id()));
    std::fs::write(&path, "tick_rate = 120.0\n").unwrap();

    std::env::set_var(CONFIG_ENV, &path);
    let loaded = RigConfig::load();
    std::env::set_var(CONFIG_ENV, "/nonexistent/pbmc.toml");
    let missing = RigConfig::load();
    std::env::remove_var(CONFIG_ENV);
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.unwrap().tick_rate, 120.0);
    assert!(matches!(missing, Err(ConfigError::Io(_))));
}

#[test]
fn test_spawn_default_scene() {
    let spawned = spawn(&RigConfig::default()).unwrap();
    assert_eq!(spawned.props.len(), 3);
    assert!(spawned.prop("mug").is_some());
    assert!(spawned.prop("teapot").is_none());
    for hand in [Hand::Left, Hand::Right] {
        let rig = spawned.rig.hand(hand);
        assert!(rig.follower().is_active());
        assert!(rig.grasp().is_active());
        assert_eq!(rig.grasp().hand(), Some(spawned.hand_body(hand)));
    }
}

#[test]
fn test_spawn_rejects_invalid_config() {
    let mut config = RigConfig::default();
    config.grasp.volume_radius = 0.0;
    assert!(matches!(spawn(&config), Err(RigError::Config(_))));
}
