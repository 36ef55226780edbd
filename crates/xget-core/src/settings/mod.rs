//! User settings: enable switch, mirror domain and per-platform toggles.
//!
//! Settings live in the host's key-value storage as three top-level keys
//! (`enabled`, `xgetDomain`, `enabledPlatforms`). Reads always merge the
//! stored record over the defaults so platform keys added by an update show
//! up with their default value instead of being missing.

mod domain;

pub use domain::{cleanup_domain, is_valid_domain};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::platform;

/// Mirror domain used when the user has not configured one.
pub const DEFAULT_MIRROR_DOMAIN: &str = "xget.xi-xu.me";

pub const KEY_ENABLED: &str = "enabled";
pub const KEY_MIRROR_DOMAIN: &str = "xgetDomain";
pub const KEY_ENABLED_PLATFORMS: &str = "enabledPlatforms";

/// Platform key -> enabled.
pub type EnabledPlatforms = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub enabled: bool,
    #[serde(rename = "xgetDomain")]
    pub mirror_domain: String,
    #[serde(rename = "enabledPlatforms")]
    pub enabled_platforms: EnabledPlatforms,
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_domain(DEFAULT_MIRROR_DOMAIN)
    }
}

impl Settings {
    /// Defaults with every known platform enabled and the given mirror domain.
    pub fn with_domain(mirror_domain: &str) -> Self {
        Self {
            enabled: true,
            mirror_domain: mirror_domain.to_string(),
            enabled_platforms: platform::all()
                .iter()
                .map(|p| (p.key.to_string(), true))
                .collect(),
        }
    }

    /// Enabled and pointed at a mirror.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.mirror_domain.is_empty()
    }

    pub fn platform_enabled(&self, key: &str) -> bool {
        self.enabled_platforms.get(key).copied().unwrap_or(false)
    }

    /// Flatten into the storage record shape.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert(KEY_ENABLED.to_string(), Value::Bool(self.enabled));
        record.insert(
            KEY_MIRROR_DOMAIN.to_string(),
            Value::String(self.mirror_domain.clone()),
        );
        let platforms: Map<String, Value> = self
            .enabled_platforms
            .iter()
            .map(|(k, v)| (k.clone(), Value::Bool(*v)))
            .collect();
        record.insert(KEY_ENABLED_PLATFORMS.to_string(), Value::Object(platforms));
        record
    }

    /// Merge a stored record over `defaults`.
    ///
    /// Top-level keys with the wrong type fall back to the default. Platform
    /// toggles merge per key, so a stored map missing a newer platform keeps
    /// that platform's default.
    pub fn merged_over(defaults: &Settings, record: &Map<String, Value>) -> Settings {
        let mut merged = defaults.clone();
        if let Some(enabled) = record.get(KEY_ENABLED).and_then(Value::as_bool) {
            merged.enabled = enabled;
        }
        if let Some(domain) = record.get(KEY_MIRROR_DOMAIN).and_then(Value::as_str) {
            merged.mirror_domain = domain.to_string();
        }
        if let Some(platforms) = record.get(KEY_ENABLED_PLATFORMS).and_then(Value::as_object) {
            for (key, value) in platforms {
                if let Some(on) = value.as_bool() {
                    merged.enabled_platforms.insert(key.clone(), on);
                }
            }
        }
        merged
    }
}
