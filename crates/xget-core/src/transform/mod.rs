//! URL transformer: rewrites a source download URL into its mirror form.
//!
//! `https://github.com/a/b/x.zip` with mirror `mirror.example` becomes
//! `https://mirror.example/gh/a/b/x.zip`. Query and fragment are carried over
//! verbatim. The function is pure; a mirror URL fed back in never matches a
//! platform, so there is no double rewrite.

mod path;

pub use path::PathRewrite;

use crate::platform;
use crate::settings::EnabledPlatforms;

/// `pathname + search + hash`, with empty search/hash omitted.
fn path_query_fragment(parsed: &url::Url) -> String {
    let mut out = parsed.path().to_string();
    if let Some(q) = parsed.query().filter(|q| !q.is_empty()) {
        out.push('?');
        out.push_str(q);
    }
    if let Some(f) = parsed.fragment().filter(|f| !f.is_empty()) {
        out.push('#');
        out.push_str(f);
    }
    out
}

/// Rewrite `url` through `mirror_domain`.
///
/// Returns `None` when no platform matches, the platform is disabled or absent
/// from `enabled_platforms`, or `url` does not parse.
pub fn transform_url(
    url: &str,
    mirror_domain: &str,
    enabled_platforms: &EnabledPlatforms,
) -> Option<String> {
    let entry = platform::lookup(url)?;
    if !enabled_platforms.get(entry.key).copied().unwrap_or(false) {
        return None;
    }

    let parsed = match url::Url::parse(url) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(platform = entry.key, "cannot parse url {url}: {e}");
            return None;
        }
    };

    let path = path_query_fragment(&parsed);
    let rewritten = PathRewrite::for_platform(entry.key).apply(&path, entry.key);
    Some(format!("https://{mirror_domain}/{}{rewritten}", entry.key))
}
