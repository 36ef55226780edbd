//! Editable settings state behind the popup controls.

use std::collections::BTreeMap;

use crate::error::FormError;
use crate::settings::{cleanup_domain, Settings};

/// Platforms with a toggle in the popup, in display order.
pub const VISIBLE_PLATFORMS: &[&str] = &[
    "gh", "gl", "gitea", "codeberg", "sf", "aosp", "hf", "npm", "pypi", "conda", "maven",
    "rubygems", "crates", "nuget", "golang", "arxiv", "fdroid",
];

/// Infrastructure platforms that are always saved as enabled.
pub const FORCED_PLATFORMS: &[&str] = &[
    "pypi-files",
    "conda-community",
    "apache",
    "gradle",
    "cran",
    "cpan",
    "ctan",
    "packagist",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    enabled: bool,
    domain: String,
    toggles: BTreeMap<&'static str, bool>,
}

impl SettingsForm {
    /// Disabled, no domain, every visible platform on.
    pub fn fallback() -> Self {
        Self {
            enabled: false,
            domain: String::new(),
            toggles: VISIBLE_PLATFORMS.iter().map(|k| (*k, true)).collect(),
        }
    }

    /// Form state for loaded settings. The switch only shows as on when a
    /// domain is configured.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut form = Self::fallback();
        form.domain = settings.mirror_domain.clone();
        form.enabled = settings.enabled && !form.domain.trim().is_empty();
        for (key, on) in form.toggles.iter_mut() {
            if let Some(stored) = settings.enabled_platforms.get(*key) {
                *on = *stored;
            }
        }
        form
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn platform(&self, key: &str) -> Option<bool> {
        if FORCED_PLATFORMS.contains(&key) {
            return Some(true);
        }
        self.toggles.get(key).copied()
    }

    fn has_domain(&self) -> bool {
        !self.domain.trim().is_empty()
    }

    /// Turning the switch on needs a domain; the switch stays off otherwise.
    pub fn set_enabled(&mut self, on: bool) -> Result<(), FormError> {
        if on && !self.has_domain() {
            self.enabled = false;
            return Err(FormError::EnableWithoutDomain);
        }
        self.enabled = on;
        Ok(())
    }

    /// Switch the extension off; always allowed.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Returns `true` when clearing the domain switched the extension off.
    pub fn set_domain(&mut self, domain: &str) -> bool {
        self.domain = domain.to_string();
        if self.enabled && !self.has_domain() {
            self.enabled = false;
            return true;
        }
        false
    }

    pub fn set_platform(&mut self, key: &str, on: bool) -> Result<(), FormError> {
        if FORCED_PLATFORMS.contains(&key) {
            return Err(FormError::ForcedPlatform(key.to_string()));
        }
        match self.toggles.get_mut(key) {
            Some(slot) => {
                *slot = on;
                Ok(())
            }
            None => Err(FormError::UnknownPlatform(key.to_string())),
        }
    }

    /// Full settings object to save: cleaned domain, visible toggles and the
    /// forced platforms.
    pub fn to_settings(&self) -> Result<Settings, FormError> {
        let domain = self.domain.trim();
        if self.enabled && domain.is_empty() {
            return Err(FormError::EnableWithoutDomain);
        }
        let mut enabled_platforms: BTreeMap<String, bool> = self
            .toggles
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();
        for key in FORCED_PLATFORMS {
            enabled_platforms.insert(key.to_string(), true);
        }
        Ok(Settings {
            enabled: self.enabled,
            mirror_domain: cleanup_domain(domain),
            enabled_platforms,
        })
    }
}
