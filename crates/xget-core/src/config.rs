use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::settings::DEFAULT_MIRROR_DOMAIN;

/// Extension URL the CLI host reports when none is configured (Chromium family).
pub const DEFAULT_EXTENSION_URL: &str = "chrome-extension://xget-now/";

/// User agent the CLI host reports when none is configured.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Global configuration loaded from `~/.config/xget/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XgetConfig {
    /// Mirror domain written into freshly created settings.
    pub default_mirror_domain: String,
    /// How long the settings form waits for `getSettings` before falling back.
    pub settings_load_timeout_ms: u64,
    /// Override for the file backing the local storage area.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
    /// Extension resource URL used for environment detection.
    #[serde(default)]
    pub extension_url: Option<String>,
    /// User agent used for environment detection.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for XgetConfig {
    fn default() -> Self {
        Self {
            default_mirror_domain: DEFAULT_MIRROR_DOMAIN.to_string(),
            settings_load_timeout_ms: 3000,
            storage_path: None,
            extension_url: None,
            user_agent: None,
        }
    }
}

impl XgetConfig {
    pub fn settings_load_timeout(&self) -> Duration {
        Duration::from_millis(self.settings_load_timeout_ms)
    }

    pub fn extension_url(&self) -> &str {
        self.extension_url.as_deref().unwrap_or(DEFAULT_EXTENSION_URL)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    /// Storage file: the configured override, else `~/.local/state/xget/storage.json`.
    pub fn resolved_storage_path(&self) -> Result<PathBuf> {
        match &self.storage_path {
            Some(p) => Ok(p.clone()),
            None => {
                let xdg_dirs = xdg::BaseDirectories::with_prefix("xget")?;
                Ok(xdg_dirs.get_state_home().join("xget").join("storage.json"))
            }
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("xget")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<XgetConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = XgetConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(&path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: XgetConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = XgetConfig::default();
        assert_eq!(cfg.default_mirror_domain, "xget.xi-xu.me");
        assert_eq!(cfg.settings_load_timeout(), Duration::from_secs(3));
        assert!(cfg.storage_path.is_none());
        assert!(cfg.extension_url().starts_with("chrome-extension://"));
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = XgetConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: XgetConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.default_mirror_domain, cfg.default_mirror_domain);
        assert_eq!(parsed.settings_load_timeout_ms, cfg.settings_load_timeout_ms);
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            default_mirror_domain = "mirror.example"
            settings_load_timeout_ms = 500
            storage_path = "/tmp/xget/storage.json"
            extension_url = "moz-extension://abc/"
        "#;
        let cfg: XgetConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.default_mirror_domain, "mirror.example");
        assert_eq!(cfg.settings_load_timeout(), Duration::from_millis(500));
        assert_eq!(
            cfg.resolved_storage_path().unwrap(),
            PathBuf::from("/tmp/xget/storage.json")
        );
        assert_eq!(cfg.extension_url(), "moz-extension://abc/");
        assert!(cfg.user_agent.is_none());
        assert_eq!(cfg.user_agent(), DEFAULT_USER_AGENT);
    }
}
