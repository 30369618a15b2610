use super::data::{Config, OutputLimits};
use super::io::ConfigError;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.effective_model(), "gemini-2.5-flash");
    assert_eq!(
        config.effective_base_url(),
        "https://generativelanguage.googleapis.com/v1beta"
    );
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.set_value("model", "gemini-2.5-pro").expect("set model");
    config
        .set_value("chat-max-output-tokens", "64")
        .expect("set limit");
    config.save_to_path(&config_path).expect("save");

    let mut loaded = Config::load_from_path(&config_path).expect("load");
    assert_eq!(loaded.model.as_deref(), Some("gemini-2.5-pro"));
    assert_eq!(loaded.limits.chat_max_output_tokens, 64);
    assert_eq!(loaded.limits.draft_max_output_tokens, 200);

    loaded.unset_value("model").expect("unset model");
    loaded
        .unset_value("chat-max-output-tokens")
        .expect("unset limit");
    loaded.save_to_path(&config_path).expect("save again");

    let reloaded = Config::load_from_path(&config_path).expect("reload");
    assert_eq!(reloaded.model, None);
    assert_eq!(reloaded.limits, OutputLimits::default());
}

#[test]
fn partial_limits_table_keeps_other_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "base_url = \"http://localhost:8080/v1beta\"\n\n[limits]\nanalysis_max_output_tokens = 60\n",
    )
    .expect("write config");

    let config = Config::load_from_path(&config_path).expect("load");
    assert_eq!(config.effective_base_url(), "http://localhost:8080/v1beta");
    assert_eq!(config.limits.analysis_max_output_tokens, 60);
    assert_eq!(config.limits.chat_max_output_tokens, 150);
}

#[test]
fn invalid_toml_reports_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "model = ").expect("write config");

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config at"));
}

#[test]
fn set_value_rejects_unknown_keys_and_bad_limits() {
    let mut config = Config::default();

    let err = config.set_value("theme", "dark").unwrap_err();
    assert!(err.contains("unknown config key 'theme'"));
    assert!(config.set_value("draft-max-output-tokens", "0").is_err());
    assert!(config.set_value("draft-max-output-tokens", "many").is_err());
    assert!(config.set_value("model", "   ").is_err());
    assert_eq!(config, Config::default());
}

#[test]
fn describe_marks_defaults() {
    let mut config = Config::default();
    config
        .set_value("profile", "/tmp/profile.toml")
        .expect("set profile");

    let lines = config.describe();
    assert_eq!(lines[0], "model: gemini-2.5-flash (default)");
    assert!(lines[2].ends_with("profile.toml"));
    assert_eq!(config.profile, Some(PathBuf::from("/tmp/profile.toml")));
}

#[test]
fn explicit_config_path_wins() {
    let explicit = PathBuf::from("/tmp/folio-test.toml");
    let resolved = Config::resolve_path(Some(&explicit)).expect("resolve");
    assert_eq!(resolved, explicit);
}
