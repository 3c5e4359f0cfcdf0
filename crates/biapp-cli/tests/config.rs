use std::time::Duration;

use biapp_cli::config::{self, CURRENT_VERSION, CliConfig};
use serde_json::json;

#[test]
fn unversioned_config_is_migrated() {
    let contents = json!({
        "api_base_url": "http://localhost:8000/api",
        "timeout_secs": 5,
        "created_at": "2025-01-02T03:04:05Z"
    })
    .to_string();

    let parsed = config::parse_config(&contents).unwrap();
    assert_eq!(parsed.config_version, 1);
    assert_eq!(parsed.ai_timeout_secs, 120);
    assert_eq!(parsed.timeout_secs, 5);
}

#[test]
fn migration_keeps_existing_values() {
    let migrated = config::migrate(json!({ "ai_timeout_secs": 30 }), 0).unwrap();
    assert_eq!(migrated["ai_timeout_secs"], 30);
    assert_eq!(migrated["config_version"], 1);
}

#[test]
fn newer_config_is_rejected() {
    let err = config::migrate(json!({}), CURRENT_VERSION + 1).unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn out_of_range_version_is_rejected() {
    let wrapped = json!({ "config_version": (1u64 << 32) + 1 }).to_string();
    let err = config::parse_config(&wrapped).unwrap_err();
    assert!(err.to_string().contains("not a supported version number"));

    assert!(config::parse_config(r#"{ "config_version": -1 }"#).is_err());
    assert!(config::parse_config(r#"{ "config_version": "1" }"#).is_err());
}

#[test]
fn non_object_config_is_rejected() {
    assert!(config::parse_config("[1, 2]").is_err());
    assert!(config::parse_config("not json").is_err());
}

#[test]
fn save_then_load() {
    let dir = tempfile::TempDir::new().unwrap();
    assert!(config::load_from(dir.path()).unwrap().is_none());

    let mut stored = CliConfig::new("http://127.0.0.1:9000/api");
    stored.config_version = 0;
    stored.timeout_secs = 3;
    let path = config::save_to(dir.path(), &stored).unwrap();
    assert!(path.ends_with("config.json"));
    assert!(!dir.path().join("config.json.tmp").exists());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    let loaded = config::load_from(dir.path()).unwrap().unwrap();
    assert_eq!(loaded.config_version, CURRENT_VERSION);
    assert_eq!(loaded.api_base_url, stored.api_base_url);
    assert_eq!(loaded.timeout_secs, 3);

    config::delete_in(dir.path()).unwrap();
    assert!(config::load_from(dir.path()).unwrap().is_none());
    // Deleting twice is fine.
    config::delete_in(dir.path()).unwrap();
}

#[test]
fn url_override_wins() {
    let stored = CliConfig::new("http://stored/api");

    let client = stored.client_config(None);
    assert_eq!(client.base_url, "http://stored/api");
    assert_eq!(client.timeout, Duration::from_secs(10));
    assert_eq!(client.ai_timeout, Duration::from_secs(120));

    assert_eq!(
        stored.client_config(Some("http://flag/api")).base_url,
        "http://flag/api"
    );
    assert_eq!(stored.client_config(Some("  ")).base_url, "http://stored/api");
}
