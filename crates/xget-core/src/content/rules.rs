//! Download-link classification.
//!
//! One ordered ruleset: explicit `download` attribute, file extension,
//! host-specific path shapes, then link text. The first signal wins. A host
//! rule may also exclude a link outright (a bare releases index is a page,
//! not a file), which stops the text heuristic from claiming it.

use url::Url;

/// The parts of an anchor the classifier looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkInfo {
    /// Absolute link target.
    pub href: String,
    pub has_download_attribute: bool,
    /// Visible link text.
    pub text: String,
}

impl LinkInfo {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_download_attribute(mut self, present: bool) -> Self {
        self.has_download_attribute = present;
        self
    }
}

/// Why a link was taken for a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadSignal {
    DownloadAttribute,
    FileExtension(&'static str),
    HostRule(&'static str),
    LinkText(&'static str),
}

/// Extensions that mark a path as a downloadable file.
pub const FILE_EXTENSIONS: &[&str] = &[
    ".zip", ".tar.gz", ".tar.bz2", ".tar.xz", ".7z", ".rar", ".gz", ".bz2", ".exe", ".msi",
    ".dmg", ".pkg", ".deb", ".rpm", ".apk", ".jar", ".war", ".ear", ".iso", ".img", ".pdf",
    ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".mp4", ".avi", ".mkv", ".mov", ".wmv",
    ".flv", ".mp3", ".wav", ".flac", ".ogg", ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff",
    ".svg", ".whl", ".egg", ".gem", ".nupkg",
];

/// Link texts that mark a download, matched exactly or as a `"<phrase> "` prefix.
pub const DOWNLOAD_PHRASES: &[&str] = &["download", "download file", "get file"];

const PACKAGE_EXTENSIONS: &[&str] = &[
    ".gem", ".tar.gz", ".crate", ".zip", ".nupkg", ".tgz", ".tar.bz2",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Download,
    Excluded,
    Pass,
}

impl From<bool> for Verdict {
    fn from(hit: bool) -> Self {
        if hit {
            Verdict::Download
        } else {
            Verdict::Pass
        }
    }
}

struct HostRule {
    name: &'static str,
    hosts: &'static [&'static str],
    check: fn(&Url, &str) -> Verdict,
}

fn ends_with_any(path: &str, exts: &[&str]) -> bool {
    exts.iter().any(|e| path.ends_with(e))
}

fn release_assets(_: &Url, path: &str) -> Verdict {
    if path.contains("/releases/download/")
        || (path.contains("/archive/") && ends_with_any(path, &[".zip", ".tar.gz"]))
        || path.contains("/raw/")
    {
        Verdict::Download
    } else if path.ends_with("/releases") || path.ends_with("/releases/") {
        Verdict::Excluded
    } else {
        Verdict::Pass
    }
}

fn gitlab_archives(_: &Url, path: &str) -> Verdict {
    (path.contains("/-/archive/")
        || (path.contains("/-/releases/") && path.contains("/downloads/")))
    .into()
}

fn hf_resolve(_: &Url, path: &str) -> Verdict {
    path.contains("/resolve/").into()
}

fn npm_tarball(_: &Url, path: &str) -> Verdict {
    (path.contains("/-/") && path.ends_with(".tgz")).into()
}

fn pypi_packages(_: &Url, path: &str) -> Verdict {
    (path.contains("/packages/") && ends_with_any(path, &[".tar.gz", ".whl", ".egg"])).into()
}

fn sourceforge_download(url: &Url, path: &str) -> Verdict {
    let mirror = url
        .query_pairs()
        .any(|(k, v)| k == "use_mirror" && !v.is_empty());
    (path.contains("/download") || mirror).into()
}

fn conda_packages(_: &Url, path: &str) -> Verdict {
    ends_with_any(path, &[".conda", ".tar.bz2"]).into()
}

fn package_files(_: &Url, path: &str) -> Verdict {
    ends_with_any(path, PACKAGE_EXTENSIONS).into()
}

const HOST_RULES: &[HostRule] = &[
    HostRule {
        name: "release-assets",
        hosts: &["github.com", "gitea.com", "codeberg.org"],
        check: release_assets,
    },
    HostRule {
        name: "gitlab-archive",
        hosts: &["gitlab.com"],
        check: gitlab_archives,
    },
    HostRule {
        name: "hf-resolve",
        hosts: &["huggingface.co"],
        check: hf_resolve,
    },
    HostRule {
        name: "npm-tarball",
        hosts: &["registry.npmjs.org"],
        check: npm_tarball,
    },
    HostRule {
        name: "pypi-package",
        hosts: &["pypi.org", "files.pythonhosted.org"],
        check: pypi_packages,
    },
    HostRule {
        name: "sourceforge-download",
        hosts: &["sourceforge.net"],
        check: sourceforge_download,
    },
    HostRule {
        name: "conda-package",
        hosts: &["repo.anaconda.com", "conda.anaconda.org"],
        check: conda_packages,
    },
    HostRule {
        name: "package-file",
        hosts: &[
            "rubygems.org",
            "cran.r-project.org",
            "crates.io",
            "repo.packagist.org",
            "api.nuget.org",
            "proxy.golang.org",
        ],
        check: package_files,
    },
];

fn link_text_phrase(text: &str) -> Option<&'static str> {
    let text = text.trim().to_lowercase();
    DOWNLOAD_PHRASES.iter().copied().find(|phrase| {
        text == *phrase
            || text
                .strip_prefix(phrase)
                .is_some_and(|rest| rest.starts_with(' '))
    })
}

/// Classify an anchor. `None` leaves the click alone.
pub fn classify_link(link: &LinkInfo) -> Option<DownloadSignal> {
    let url = match Url::parse(&link.href) {
        Ok(u) => u,
        Err(e) => {
            tracing::debug!("unparseable link {}: {e}", link.href);
            return None;
        }
    };

    if link.has_download_attribute {
        return Some(DownloadSignal::DownloadAttribute);
    }

    let path = url.path().to_lowercase();
    if let Some(ext) = FILE_EXTENSIONS.iter().copied().find(|e| path.ends_with(e)) {
        return Some(DownloadSignal::FileExtension(ext));
    }

    if let Some(host) = url.host_str() {
        for rule in HOST_RULES.iter().filter(|r| r.hosts.contains(&host)) {
            match (rule.check)(&url, &path) {
                Verdict::Download => return Some(DownloadSignal::HostRule(rule.name)),
                Verdict::Excluded => return None,
                Verdict::Pass => {}
            }
        }
    }

    link_text_phrase(&link.text).map(DownloadSignal::LinkText)
}
