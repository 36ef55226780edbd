//! The static platform table. Order is significant: lookup returns the first match.

use std::sync::LazyLock;

use super::entry::{PlatformCategory, PlatformEntry};

use PlatformCategory::{AiMl, CodeHosting, Other, PackageRegistry};

const TABLE: &[(&str, &str, &str, PlatformCategory)] = &[
    ("gh", "https://github.com", "GitHub", CodeHosting),
    ("gl", "https://gitlab.com", "GitLab", CodeHosting),
    ("gitea", "https://gitea.com", "Gitea", CodeHosting),
    ("codeberg", "https://codeberg.org", "Codeberg", CodeHosting),
    ("sf", "https://sourceforge.net", "SourceForge", CodeHosting),
    ("aosp", "https://android.googlesource.com", "AOSP", CodeHosting),
    ("hf", "https://huggingface.co", "Hugging Face", AiMl),
    ("npm", "https://registry.npmjs.org", "npm", PackageRegistry),
    ("pypi", "https://pypi.org", "PyPI", PackageRegistry),
    ("pypi-files", "https://files.pythonhosted.org", "PyPI Files", PackageRegistry),
    ("conda", "https://repo.anaconda.com", "Conda", PackageRegistry),
    ("conda-community", "https://conda.anaconda.org", "Conda Community", PackageRegistry),
    ("maven", "https://repo1.maven.org", "Maven", PackageRegistry),
    ("apache", "https://downloads.apache.org", "Apache", PackageRegistry),
    ("gradle", "https://plugins.gradle.org", "Gradle", PackageRegistry),
    ("rubygems", "https://rubygems.org", "RubyGems", PackageRegistry),
    ("cran", "https://cran.r-project.org", "CRAN", PackageRegistry),
    ("cpan", "https://www.cpan.org", "CPAN", PackageRegistry),
    ("ctan", "https://tug.ctan.org", "CTAN", PackageRegistry),
    ("golang", "https://proxy.golang.org", "Go Modules", PackageRegistry),
    ("nuget", "https://api.nuget.org", "NuGet", PackageRegistry),
    ("crates", "https://crates.io", "Crates.io", PackageRegistry),
    ("packagist", "https://repo.packagist.org", "Packagist", PackageRegistry),
    ("arxiv", "https://arxiv.org", "arXiv", Other),
    ("fdroid", "https://f-droid.org", "F-Droid", Other),
];

pub(super) static PLATFORMS: LazyLock<Vec<PlatformEntry>> = LazyLock::new(|| {
    TABLE
        .iter()
        .map(|&(key, base, name, category)| PlatformEntry::new(key, base, name, category))
        .collect()
});
