//! Integration tests for config file resolution and graceful degradation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate RNX_CONFIG are marked with #[serial].

use rnx_common::config::{load_toml_config, ConfigFileResolver, ConfigSource, CONFIG_ENV_VAR};
use rnx_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_load_full_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
        [logging]
        level = "debug"

        [levels]
        input_dir = "/data/nl52"
        output = "report.xlsx"
        category = "lmax"
        all_categories = true
        band_labels = ["Main [dB]", "12.5 Hz"]

        [spectrum]
        channel = 2
        effective_band_factor = 0.5
        output_dir = "/data/out"
        json_summary = "/data/out/spectrum.json"
        "#,
    );

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.file.is_none());
    assert_eq!(config.levels.input_dir, Some(PathBuf::from("/data/nl52")));
    assert_eq!(config.levels.category.as_deref(), Some("lmax"));
    assert_eq!(config.levels.all_categories, Some(true));
    assert_eq!(config.levels.band_labels.as_ref().map(|l| l.len()), Some(2));
    assert_eq!(config.spectrum.channel, Some(2));
    assert_eq!(config.spectrum.effective_band_factor, Some(0.5));
    assert_eq!(config.spectrum.json_summary, Some(PathBuf::from("/data/out/spectrum.json")));
}

#[test]
fn test_invalid_toml_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[levels\nextension = ");

    match load_toml_config(&path) {
        Err(Error::Config(msg)) => assert!(msg.contains("Parse")),
        other => panic!("Expected Config error, got {:?}", other),
    }
}

#[test]
#[serial]
fn test_env_var_is_used_when_no_cli_arg() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[levels]\nextension = \"rnd\"\n");
    env::set_var(CONFIG_ENV_VAR, &path);

    let resolver = ConfigFileResolver::new();
    let (resolved, source) = resolver.resolve(None).unwrap();
    assert_eq!(resolved, path);
    assert_eq!(source, ConfigSource::Environment);

    let config = resolver.load(None).unwrap();
    assert_eq!(config.levels.extension.as_deref(), Some("rnd"));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_cli_arg_overrides_env_var() {
    let dir = TempDir::new().unwrap();
    let cli_path = write_config(&dir, "[logging]\nlevel = \"trace\"\n");
    env::set_var(CONFIG_ENV_VAR, "/nonexistent/env/config.toml");

    let config = ConfigFileResolver::new().load(Some(&cli_path)).unwrap();
    assert_eq!(config.logging.level, "trace");

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_env_file_falls_back_to_defaults() {
    env::set_var(CONFIG_ENV_VAR, "/nonexistent/env/config.toml");

    let config = ConfigFileResolver::new().load(None).unwrap();
    assert_eq!(config.logging.level, "info");
    assert!(config.levels.output.is_none());

    env::remove_var(CONFIG_ENV_VAR);
}
