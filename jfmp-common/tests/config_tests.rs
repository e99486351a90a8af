//! Unit tests for configuration loading and graceful degradation
//!
//! Covers:
//! - Missing TOML files fall back to built-in defaults
//! - Malformed TOML files are reported as configuration errors
//! - Priority order for config file resolution (CLI > env > default)
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate JFMP_CONFIG are marked with #[serial].

use jfmp_common::config::{resolve_config_path, TomlConfig, CONFIG_ENV_VAR};
use jfmp_common::policy::{PolicyConfig, PolicyStore, StaticPolicyStore};
use jfmp_common::{DecoderPriority, Error};
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_full_config_round_trip_through_file() {
    let file = write_config(
        r#"
[policy]
hardware_acceleration = false
decoder_priority = "software_first"
hdr_enabled = false
spatial_audio = true

[logging]
level = "debug"

[spatial]
bind_retry_delay_ms = 250

[events]
capacity = 32
"#,
    );

    let config = TomlConfig::load(file.path()).unwrap();

    assert!(!config.policy.hardware_acceleration);
    assert_eq!(config.policy.decoder_priority, DecoderPriority::SoftwareFirst);
    assert!(!config.policy.hdr_enabled);
    assert!(config.policy.spatial_audio);
    assert!(!config.policy.battery_optimization);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.spatial.bind_retry_delay_ms, 250);
    assert_eq!(config.events.capacity, 32);

    let store = StaticPolicyStore::new(config.policy);
    let policy = store.decoder_selection_policy();
    assert!(!policy.hardware_acceleration_enabled);
    assert!(store.spatial_audio_enabled());
}

#[test]
fn test_malformed_file_is_config_error() {
    let file = write_config("[policy\nhdr_enabled = maybe");
    let result = TomlConfig::load(file.path());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_unknown_priority_is_config_error() {
    let file = write_config("[policy]\ndecoder_priority = \"fastest\"\n");
    assert!(TomlConfig::load(file.path()).is_err());
}

#[test]
fn test_missing_cli_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist.toml");

    let config = TomlConfig::load_or_default(Some(&missing)).unwrap();

    assert_eq!(config, TomlConfig::default());
    assert_eq!(config.policy, PolicyConfig::default());
}

#[test]
#[serial]
fn test_env_var_used_when_no_cli_path() {
    let file = write_config("[policy]\nhdr_enabled = false\n");
    env::set_var(CONFIG_ENV_VAR, file.path());

    let resolved = resolve_config_path(None);
    let config = TomlConfig::load_or_default(None).unwrap();

    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(resolved, Some(file.path().to_path_buf()));
    assert!(!config.policy.hdr_enabled);
}

#[test]
#[serial]
fn test_cli_path_takes_precedence_over_env() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/jfmp-from-env.toml");

    let cli = PathBuf::from("/tmp/jfmp-from-cli.toml");
    let resolved = resolve_config_path(Some(&cli));

    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(resolved, Some(cli));
}

#[test]
#[serial]
fn test_blank_env_var_ignored() {
    env::set_var(CONFIG_ENV_VAR, "   ");

    let resolved = resolve_config_path(None);

    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(resolved, jfmp_common::config::default_config_path());
}
