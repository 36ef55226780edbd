//! Runtime environment detection.
//!
//! The browser family is read from the extension's own resource URL scheme
//! first (`moz-extension://`, `safari-web-extension://`), then from the user
//! agent. The result picks the native API backend and the default storage
//! area.

use regex::Regex;
use std::sync::LazyLock;

use super::StorageArea;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserFamily {
    Firefox,
    Safari,
    Edge,
    Opera,
    Chrome,
}

impl BrowserFamily {
    /// Firefox-family hosts expose the promise-returning `browser` object.
    pub fn is_firefox(self) -> bool {
        matches!(self, BrowserFamily::Firefox)
    }

    pub fn is_chromium(self) -> bool {
        matches!(
            self,
            BrowserFamily::Chrome | BrowserFamily::Edge | BrowserFamily::Opera
        )
    }

    /// Firefox and Safari expose `browser.*`; the Chromium family only `chrome.*`.
    pub fn prefers_promises(self) -> bool {
        !self.is_chromium()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BrowserFamily::Firefox => "firefox",
            BrowserFamily::Safari => "safari",
            BrowserFamily::Edge => "edge",
            BrowserFamily::Opera => "opera",
            BrowserFamily::Chrome => "chrome",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserFlavor {
    pub family: BrowserFamily,
    pub major_version: u32,
    pub mobile: bool,
    pub dev_build: bool,
}

macro_rules! static_regex {
    ($name:ident, $pat:expr) => {
        #[allow(clippy::expect_used)]
        static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($pat).expect("static regex is valid"));
    };
}

static_regex!(FIREFOX_VERSION, r"Firefox/(\d+)");
static_regex!(SAFARI_VERSION, r"Version/(\d+)");
static_regex!(EDGE_MARKER, r"\bEdg/");
static_regex!(EDGE_VERSION, r"Edg/(\d+)");
static_regex!(OPERA_MARKER, r"\bOPR/");
static_regex!(OPERA_VERSION, r"OPR/(\d+)");
static_regex!(CHROME_VERSION, r"\bChrom(?:e|ium)/(\d+)");
static_regex!(MOBILE_MARKER, r"\bMobile\b");
static_regex!(DEV_BUILD, r"^\d+\.\d+\.\d+\D");

fn major(re: &Regex, ua: &str, fallback: u32) -> u32 {
    re.captures(ua)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(fallback)
}

impl BrowserFlavor {
    /// Classify the host from the extension resource URL, user agent and
    /// manifest version string.
    pub fn detect(extension_url: &str, user_agent: &str, manifest_version: &str) -> Self {
        let (family, major_version) = if extension_url.starts_with("moz-extension://") {
            (BrowserFamily::Firefox, major(&FIREFOX_VERSION, user_agent, 115))
        } else if extension_url.starts_with("safari-web-extension://") {
            (BrowserFamily::Safari, major(&SAFARI_VERSION, user_agent, 15))
        } else if EDGE_MARKER.is_match(user_agent) {
            (BrowserFamily::Edge, major(&EDGE_VERSION, user_agent, 120))
        } else if OPERA_MARKER.is_match(user_agent) {
            (BrowserFamily::Opera, major(&OPERA_VERSION, user_agent, 120))
        } else {
            (BrowserFamily::Chrome, major(&CHROME_VERSION, user_agent, 120))
        };

        Self {
            family,
            major_version,
            mobile: MOBILE_MARKER.is_match(user_agent),
            dev_build: DEV_BUILD.is_match(manifest_version),
        }
    }

    /// Local storage on Firefox-family hosts (weaker sync guarantees), sync elsewhere.
    pub fn preferred_storage_area(&self) -> StorageArea {
        if self.family.is_firefox() {
            StorageArea::Local
        } else {
            StorageArea::Sync
        }
    }
}
