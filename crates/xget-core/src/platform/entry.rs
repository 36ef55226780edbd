use regex::Regex;

/// Broad grouping used when listing platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformCategory {
    CodeHosting,
    AiMl,
    PackageRegistry,
    Other,
}

impl PlatformCategory {
    pub fn label(self) -> &'static str {
        match self {
            PlatformCategory::CodeHosting => "code hosting",
            PlatformCategory::AiMl => "ai/ml",
            PlatformCategory::PackageRegistry => "package registry",
            PlatformCategory::Other => "other",
        }
    }
}

/// One supported source host.
///
/// `key` is unique across the table and doubles as the first path segment of
/// a rewritten URL.
#[derive(Debug)]
pub struct PlatformEntry {
    pub key: &'static str,
    pub base_url: &'static str,
    pub display_name: &'static str,
    pub category: PlatformCategory,
    host_pattern: Regex,
}

impl PlatformEntry {
    pub(super) fn new(
        key: &'static str,
        base_url: &'static str,
        display_name: &'static str,
        category: PlatformCategory,
    ) -> Self {
        // Anchored on scheme + host + leading slash only.
        #[allow(clippy::expect_used)]
        let host_pattern = Regex::new(&format!("^{}/", regex::escape(base_url)))
            .expect("escaped host pattern is valid");
        Self {
            key,
            base_url,
            display_name,
            category,
            host_pattern,
        }
    }

    /// True when `url` starts with this platform's `https://host/`.
    pub fn matches(&self, url: &str) -> bool {
        self.host_pattern.is_match(url)
    }

    /// Host part of the base URL, e.g. `github.com`.
    pub fn host(&self) -> &'static str {
        self.base_url
            .strip_prefix("https://")
            .unwrap_or(self.base_url)
    }

    /// Match pattern used to query open tabs on this platform.
    pub fn tab_url_pattern(&self) -> String {
        format!("{}/*", self.base_url)
    }
}
