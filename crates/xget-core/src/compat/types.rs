use serde::{Deserialize, Serialize};

/// Tab as returned by `tabs.query`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: i64,
    #[serde(default)]
    pub url: Option<String>,
}

/// What to do when the target file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictAction {
    /// Never overwrite; the host picks a fresh name.
    #[default]
    Uniquify,
    Overwrite,
    Prompt,
}

/// Arguments for `downloads.download`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadOptions {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default)]
    pub conflict_action: ConflictAction,
}

impl DownloadOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: None,
            conflict_action: ConflictAction::Uniquify,
        }
    }

    /// Attach the suggested filename; empty names are dropped.
    pub fn with_filename(mut self, filename: Option<&str>) -> Self {
        self.filename = filename.filter(|f| !f.is_empty()).map(str::to_string);
        self
    }
}
