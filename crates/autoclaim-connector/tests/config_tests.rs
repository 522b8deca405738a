//! Config file loading and environment overrides.

use std::collections::HashMap;

use autoclaim_connector::config::{AppConfig, ConfigError};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
bind_addr = "0.0.0.0:9090"

[function]
region = "eu-west-1"
"#,
    )
    .unwrap();

    let config = AppConfig::from_file(&path).unwrap();
    let defaults = AppConfig::default();
    assert_eq!(config.bind_addr, "0.0.0.0:9090");
    assert_eq!(config.function.region, "eu-west-1");
    assert_eq!(config.function.name, defaults.function.name);
    assert_eq!(config.notarize_url, defaults.notarize_url);
    assert_eq!(config.dispatch, defaults.dispatch);
}

#[test]
fn test_env_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "notarize_url = \"http://file.example/notarize\"\n").unwrap();

    let mut config = AppConfig::from_file(&path).unwrap();
    config
        .apply_env(env(&[
            ("AUTOCLAIM_NOTARIZE_URL", "http://env.example/notarize"),
            ("AUTOCLAIM_FUNCTION_URL", "http://127.0.0.1:9001/invoke"),
            ("AWS_ACCESS_KEY_ID", "AKIDEXAMPLE"),
            ("AUTOCLAIM_TICK_MS", "250"),
            ("AUTOCLAIM_BIND_ADDR", "  "),
        ]))
        .unwrap();

    assert_eq!(config.notarize_url, "http://env.example/notarize");
    assert_eq!(config.function.endpoint(), "http://127.0.0.1:9001/invoke");
    assert_eq!(config.function.access_key_id.as_deref(), Some("AKIDEXAMPLE"));
    assert_eq!(config.dispatch.tick_ms, 250);
    // Blank values are ignored.
    assert_eq!(config.bind_addr, AppConfig::default().bind_addr);
}

#[test]
fn test_bad_values_are_reported() {
    let mut config = AppConfig::default();
    let err = config
        .apply_env(env(&[("AUTOCLAIM_TICK_MS", "fast")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { key: "AUTOCLAIM_TICK_MS", .. }));

    config.dispatch.tick_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_missing_and_malformed_files() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("nope.toml");
    assert!(matches!(
        AppConfig::from_file(&missing),
        Err(ConfigError::Io { .. })
    ));

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "bind_addr = [").unwrap();
    assert!(matches!(
        AppConfig::from_file(&broken),
        Err(ConfigError::Parse { .. })
    ));
}
