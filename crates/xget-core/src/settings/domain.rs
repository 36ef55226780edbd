//! Mirror domain cleanup and validation.

use regex::Regex;
use std::sync::LazyLock;

const MAX_DOMAIN_LEN: usize = 253;

#[allow(clippy::expect_used)]
static DOMAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("domain regex is valid")
});

fn strip_scheme(domain: &str) -> &str {
    domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(domain)
}

/// Drop an accidental `http(s)://` prefix and a single trailing slash.
pub fn cleanup_domain(domain: &str) -> String {
    let d = strip_scheme(domain);
    d.strip_suffix('/').unwrap_or(d).to_string()
}

/// Hostname check: dot-separated labels of up to 63 alphanumerics/hyphens,
/// no leading or trailing hyphen, at most 253 characters overall.
pub fn is_valid_domain(domain: &str) -> bool {
    let d = strip_scheme(domain);
    d.len() <= MAX_DOMAIN_LEN && DOMAIN_PATTERN.is_match(d)
}
