//! Per-platform path rewriting.

/// API root that crates.io serves its download endpoints under.
const CRATES_API_PREFIX: &str = "/api/v1/crates";

/// How a platform's path is adjusted before being appended to the mirror URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRewrite {
    Identity,
    /// Strip a leading `/crates/`, then move the path under `/api/v1/crates`.
    CratesApi,
}

impl PathRewrite {
    pub fn for_platform(key: &str) -> Self {
        match key {
            "crates" => PathRewrite::CratesApi,
            _ => PathRewrite::Identity,
        }
    }

    /// Rewrite `path` (pathname + search + hash) for the given platform key.
    pub fn apply(self, path: &str, key: &str) -> String {
        match self {
            PathRewrite::Identity => path.to_string(),
            PathRewrite::CratesApi => crates_api_path(&strip_own_prefix(path, key)),
        }
    }
}

/// Strip `/<key>/` from the start of `path`, keeping the slash. Dashes in the
/// key stand for nested segments (`pypi-files` -> `/pypi/files/`).
fn strip_own_prefix(path: &str, key: &str) -> String {
    let prefix = format!("/{}/", key.replace('-', "/"));
    match path.strip_prefix(prefix.as_str()) {
        Some(rest) => format!("/{rest}"),
        None => path.to_string(),
    }
}

fn crates_api_path(path: &str) -> String {
    if path == "/" || path.starts_with("/?") {
        // search endpoint: `/` -> `/api/v1/crates`, `/?q=x` -> `/api/v1/crates?q=x`
        format!("{CRATES_API_PREFIX}{}", &path[1..])
    } else if path.starts_with('/') {
        format!("{CRATES_API_PREFIX}{path}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_for_regular_platforms() {
        assert_eq!(PathRewrite::for_platform("gh"), PathRewrite::Identity);
        assert_eq!(
            PathRewrite::Identity.apply("/gh/a/b?x=1#y", "gh"),
            "/gh/a/b?x=1#y"
        );
    }

    #[test]
    fn crates_root_and_search() {
        let r = PathRewrite::for_platform("crates");
        assert_eq!(r, PathRewrite::CratesApi);
        assert_eq!(r.apply("/", "crates"), "/api/v1/crates");
        assert_eq!(r.apply("/?q=serde", "crates"), "/api/v1/crates?q=serde");
    }

    #[test]
    fn crates_specific_crate() {
        let r = PathRewrite::CratesApi;
        assert_eq!(r.apply("/serde", "crates"), "/api/v1/crates/serde");
        assert_eq!(
            r.apply("/serde/1.0.0/download", "crates"),
            "/api/v1/crates/serde/1.0.0/download"
        );
    }

    #[test]
    fn crates_strips_own_prefix_first() {
        let r = PathRewrite::CratesApi;
        assert_eq!(
            r.apply("/crates/serde/1.0.0/download", "crates"),
            "/api/v1/crates/serde/1.0.0/download"
        );
        assert_eq!(r.apply("/crates/", "crates"), "/api/v1/crates");
        // `/crates` without the trailing slash is a crate named "crates".
        assert_eq!(r.apply("/crates", "crates"), "/api/v1/crates/crates");
    }

    #[test]
    fn dashed_keys_strip_nested_prefix() {
        assert_eq!(strip_own_prefix("/pypi/files/a.whl", "pypi-files"), "/a.whl");
        assert_eq!(strip_own_prefix("/other/a.whl", "pypi-files"), "/other/a.whl");
    }
}
