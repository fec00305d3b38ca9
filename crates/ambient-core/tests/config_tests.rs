// Page options to validated config.

use ambient_core::{BackgroundConfig, BackgroundOptions, ConfigError, Mode, Rgb};

fn parse(json: &str) -> Result<BackgroundConfig, ConfigError> {
    let opts: BackgroundOptions = serde_json::from_str(json).expect("well-formed json");
    BackgroundConfig::try_from(opts)
}

#[test]
fn empty_options_yield_defaults() {
    let config = parse("{}").unwrap();
    assert_eq!(config, BackgroundConfig::default());
    assert_eq!(config.mode, Mode::Trails);
    assert_eq!(config.line_count, 45);
    assert_eq!(config.segments, 80);
    assert_eq!(config.max_branches, 48);
    assert!(config.validate().is_ok());
}

#[test]
fn camel_case_keys_and_mixed_colors_are_accepted() {
    let config = parse(
        r##"{
            "mode": "branches",
            "colors": [16711680, "#00ff00", [0.0, 0.0, 1.0]],
            "maxBranches": 12,
            "branchCount": 3,
            "spawnIntervalMs": 250,
            "cameraZ": 10,
            "seed": 99
        }"##,
    )
    .unwrap();
    assert_eq!(config.mode, Mode::Branches);
    assert_eq!(
        config.palette.colors(),
        &[
            Rgb::new(1.0, 0.0, 0.0),
            Rgb::new(0.0, 1.0, 0.0),
            Rgb::new(0.0, 0.0, 1.0)
        ]
    );
    assert_eq!(config.max_branches, 12);
    assert_eq!(config.branch_count, 3);
    assert_eq!(config.spawn_interval_ms, 250.0);
    assert_eq!(config.camera_z, 10.0);
    assert_eq!(config.seed, Some(99));
}

#[test]
fn initial_counts_are_clamped_to_their_caps() {
    let config =
        parse(r#"{"lineCount": 5, "initialLines": 50, "maxBranches": 2, "branchCount": 9}"#)
            .unwrap();
    assert_eq!(config.initial_lines, 5);
    assert_eq!(config.branch_count, 2);

    let config = parse(r#"{"lineCount": 8}"#).unwrap();
    assert_eq!(config.initial_lines, 8);
}

#[test]
fn explicit_zero_counts_are_honored() {
    let config = parse(r#"{"lineCount": 0, "dustCount": 0, "branchCount": 0}"#).unwrap();
    assert_eq!(config.line_count, 0);
    assert_eq!(config.initial_lines, 0);
    assert_eq!(config.dust_count, 0);
    assert_eq!(config.branch_count, 0);
}

#[test]
fn empty_color_list_is_rejected() {
    assert_eq!(parse(r#"{"colors": []}"#), Err(ConfigError::EmptyPalette));
}

#[test]
fn out_of_range_values_name_the_offending_key() {
    let cases = [
        (r#"{"segments": 1}"#, "segments"),
        (r#"{"bounds": 0}"#, "bounds"),
        (r#"{"maxBranches": 0}"#, "maxBranches"),
        (r#"{"fov": 180}"#, "fov"),
        (r#"{"cameraZ": -1}"#, "cameraZ"),
        (r#"{"spawnIntervalMs": -5}"#, "spawnIntervalMs"),
        (r#"{"rotationIdleMs": -1}"#, "rotationIdleMs"),
        (r#"{"warmupMs": -1}"#, "warmupMs"),
        (r#"{"fogDensity": -0.5}"#, "fogDensity"),
    ];
    for (json, key) in cases {
        match parse(json) {
            Err(ConfigError::OutOfRange { field, .. }) => assert_eq!(field, key),
            other => panic!("{json}: expected OutOfRange, got {other:?}"),
        }
    }
}

#[test]
fn unknown_mode_fails_to_deserialize() {
    assert!(serde_json::from_str::<BackgroundOptions>(r#"{"mode": "spirals"}"#).is_err());
}
