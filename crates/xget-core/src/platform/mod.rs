//! Platform registry.
//!
//! Maps short platform keys (`gh`, `npm`, `hf`, ...) to the source host they
//! stand for. Every key maps to exactly one host, so the first anchored match
//! in table order is the only match.

mod entry;
mod table;

pub use entry::{PlatformCategory, PlatformEntry};

use table::PLATFORMS;

/// All platforms, in lookup order.
pub fn all() -> &'static [PlatformEntry] {
    PLATFORMS.as_slice()
}

/// Platform entry by key.
pub fn get(key: &str) -> Option<&'static PlatformEntry> {
    all().iter().find(|p| p.key == key)
}

/// First platform whose host pattern matches `url`.
pub fn lookup(url: &str) -> Option<&'static PlatformEntry> {
    all().iter().find(|p| p.matches(url))
}

/// Key of the platform matching `url`, if any.
pub fn detect_platform(url: &str) -> Option<&'static str> {
    lookup(url).map(|p| p.key)
}

/// `<base>/*` patterns for every platform, used to find tabs worth notifying.
pub fn tab_url_patterns() -> Vec<String> {
    all().iter().map(PlatformEntry::tab_url_pattern).collect()
}
