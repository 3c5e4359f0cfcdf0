use std::path::{Path, PathBuf};
use std::time::Duration;

use biapp_api::ClientConfig;
use biapp_api::client::{DEFAULT_AI_TIMEOUT, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

/// Environment variable that overrides the stored backend URL.
pub const API_URL_ENV: &str = "BIAPP_API_URL";

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub api_base_url: String,
    pub timeout_secs: u64,
    /// Added in v1; older configs get the default.
    pub ai_timeout_secs: u64,
    pub created_at: jiff::Timestamp,
}

impl CliConfig {
    pub fn new(api_base_url: impl Into<String>) -> Self {
        CliConfig {
            config_version: CURRENT_VERSION,
            api_base_url: api_base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            ai_timeout_secs: DEFAULT_AI_TIMEOUT.as_secs(),
            created_at: jiff::Timestamp::now(),
        }
    }

    /// Client settings, with `api_url` (flag or environment) taking
    /// precedence over the stored URL.
    pub fn client_config(&self, api_url: Option<&str>) -> ClientConfig {
        let base_url = api_url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(&self.api_base_url);
        ClientConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(self.timeout_secs),
            ai_timeout: Duration::from_secs(self.ai_timeout_secs),
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig::new(DEFAULT_BASE_URL)
    }
}

pub fn config_dir() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.biapp.cli"))
}

/// Parse a config file's contents, migrating older versions first.
pub fn parse_config(contents: &str) -> eyre::Result<CliConfig> {
    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .filter(|v| !v.is_null())
        .map(|v| {
            v.as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| eyre::eyre!("config_version {v} is not a supported version number"))
        })
        .transpose()?
        .unwrap_or(0);

    let migrated = migrate(json, on_disk_version)?;
    let config: CliConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update biapp."
        ));
    }

    // v0 -> v1: AI runs got their own timeout
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("ai_timeout_secs")
            .or_insert(serde_json::Value::from(DEFAULT_AI_TIMEOUT.as_secs()));
        obj.insert("config_version".to_string(), serde_json::Value::from(1));
        tracing::info!("migrated config v0 -> v1 (added ai_timeout_secs)");
    }

    Ok(json)
}

/// Load the config stored in `dir`, or `None` when there is none yet.
pub fn load_from(dir: &Path) -> eyre::Result<Option<CliConfig>> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    parse_config(&contents).map(Some)
}

pub fn save_to(dir: &Path, config: &CliConfig) -> eyre::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = dir.join("config.json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, &path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(path)
}

pub fn delete_in(dir: &Path) -> eyre::Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        std::fs::remove_file(&path)?;
        tracing::info!(path = %path.display(), "config deleted");
    }
    Ok(())
}

/// The stored config, or defaults when none has been written.
pub fn load_or_default() -> eyre::Result<CliConfig> {
    Ok(load_from(&config_dir()?)?.unwrap_or_default())
}
