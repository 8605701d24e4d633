use kiln2d::config::*;
use kiln2d::gpu::GpuLimits;
use kiln2d::logging::{LoggingConfig, init_logging};
use kiln2d::Color;

// ── Defaults ─────────────────────────────────────────────────────────────────

#[test]
fn test_defaults() {
    let config = RendererConfig::default();
    assert_eq!(config.window.width, 1280);
    assert_eq!(config.window.height, 720);
    assert_eq!(config.batch.max_vertices, 1000);
    assert_eq!(config.batch.max_textures, 16);
    assert_eq!(config.clear_color, Color([0.796, 0.6157, 0.4588, 1.0]));
    assert_eq!(config.shaders.colored, "Colored");
    assert_eq!(config.shaders.textured, "Textured");
    assert_eq!(config.shaders.text, "Text");
    assert!(config.validate().is_ok());
}

// ── JSON ─────────────────────────────────────────────────────────────────────

#[test]
fn test_partial_json_fills_defaults() {
    let config = RendererConfig::from_json(r#"{ "batch": { "max_vertices": 4000 } }"#).unwrap();
    assert_eq!(config.batch.max_vertices, 4000);
    assert_eq!(config.batch.max_textures, 16);
    assert_eq!(config.window, WindowSettings::default());
}

#[test]
fn test_json_round_trip() {
    let mut config = RendererConfig::default();
    config.window.title = "editor".to_string();
    config.shaders.text = "Glyphs".to_string();
    let parsed = RendererConfig::from_json(&config.to_json().unwrap()).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_malformed_json_is_parse_error() {
    assert!(matches!(RendererConfig::from_json("{ not json"), Err(ConfigError::Parse(_))));
}

// ── Validation ───────────────────────────────────────────────────────────────

#[test]
fn test_batch_bounds() {
    let too_small = RendererConfig::from_json(r#"{ "batch": { "max_vertices": 64 } }"#);
    assert!(matches!(too_small, Err(ConfigError::BatchTooSmall(64))));

    let too_large = RendererConfig::from_json(r#"{ "batch": { "max_vertices": 70000 } }"#);
    assert!(matches!(too_large, Err(ConfigError::BatchTooLarge(70000))));

    let no_slots = RendererConfig::from_json(r#"{ "batch": { "max_textures": 0 } }"#);
    assert!(matches!(no_slots, Err(ConfigError::NoTextureSlots)));

    assert!(RendererConfig::from_json(r#"{ "batch": { "max_vertices": 65 } }"#).is_ok());
}

#[test]
fn test_zero_window_rejected() {
    let result = RendererConfig::from_json(r#"{ "window": { "width": 0 } }"#);
    assert!(matches!(result, Err(ConfigError::ZeroWindow { width: 0, height: 720 })));
}

#[test]
fn test_clear_color_range() {
    let result = RendererConfig::from_json(r#"{ "clear_color": [1.5, 0.0, 0.0, 1.0] }"#);
    assert!(matches!(result, Err(ConfigError::ClearColorOutOfRange(_))));
}

#[test]
fn test_error_messages_name_the_field() {
    let err = RendererConfig::from_json(r#"{ "batch": { "max_vertices": 10 } }"#).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("max_vertices = 10"));
    assert!(message.contains("65"));
}

// ── Device limits ────────────────────────────────────────────────────────────

#[test]
fn test_clamp_to_device_slots() {
    let mut config = RendererConfig::default();
    config.clamp_to(&GpuLimits { max_texture_slots: 8, max_texture_dimension: 4096 });
    assert_eq!(config.batch.max_textures, 8);

    config.batch.max_textures = 4;
    config.clamp_to(&GpuLimits::default());
    assert_eq!(config.batch.max_textures, 4);
}

// ── Logging ──────────────────────────────────────────────────────────────────

#[test]
fn test_init_logging_is_repeatable() {
    init_logging(LoggingConfig::with_filter("kiln2d=debug"));
    init_logging(LoggingConfig::default());
    log::info!("logger installed");
}
