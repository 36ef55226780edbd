//! Download-start handling: cancel the original, relaunch through the mirror.

use serde::{Deserialize, Serialize};

use super::Coordinator;
use crate::compat::DownloadOptions;
use crate::content::Notification;
use crate::transform::transform_url;

/// The host's download item, as delivered with the determining-filename event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadItem {
    pub id: i64,
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub tab_id: Option<i64>,
}

/// The determining-filename acknowledgement. The host accepts exactly one
/// call; consuming `self` makes a second one impossible.
pub struct Suggest(Box<dyn FnOnce() + Send + 'static>);

impl Suggest {
    pub fn new(f: impl FnOnce() + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    /// Acknowledge with no filename override.
    pub fn acknowledge(self) {
        (self.0)()
    }
}

impl std::fmt::Debug for Suggest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Suggest")
    }
}

/// Where a download event ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Extension disabled or no mirror configured.
    NotApplicable,
    /// No enabled platform matched the URL.
    NoMatch,
    /// The original was cancelled and a mirror download started.
    Redirected {
        url: String,
        /// Host confirmed the cancel.
        cancelled: bool,
        /// Host confirmed the new download.
        relaunched: bool,
    },
}

impl Coordinator {
    /// Decide and perform the redirect for one download.
    ///
    /// Cancel and relaunch are independent best-effort calls: a failure of
    /// either is logged and the other still runs.
    pub async fn process_download(&self, item: &DownloadItem) -> DownloadOutcome {
        let settings = self.load_settings().await;
        if !settings.is_active() {
            return DownloadOutcome::NotApplicable;
        }

        let redirected = match transform_url(
            &item.url,
            &settings.mirror_domain,
            &settings.enabled_platforms,
        ) {
            Some(u) if u != item.url => u,
            _ => return DownloadOutcome::NoMatch,
        };

        tracing::info!(download_id = item.id, "redirecting download {} -> {}", item.url, redirected);

        let cancel = self.api().cancel_download(item.id).await;
        if let Some(reason) = cancel.recovery() {
            tracing::warn!(download_id = item.id, ?reason, "could not cancel original download");
        }

        let options = DownloadOptions::new(redirected.clone()).with_filename(item.filename.as_deref());
        let relaunch = self.api().download(&options).await;
        if let Some(reason) = relaunch.recovery() {
            tracing::warn!(download_id = item.id, ?reason, "could not start mirror download");
        }

        if let Some(tab_id) = item.tab_id.filter(|id| *id >= 0) {
            let sent = self
                .api()
                .tabs_send_message(tab_id, Notification::redirected().to_message())
                .await;
            if sent.is_recovered() {
                tracing::debug!(tab_id, "could not notify tab about redirect");
            }
        }

        DownloadOutcome::Redirected {
            url: redirected,
            cancelled: !cancel.is_recovered(),
            relaunched: !relaunch.is_recovered(),
        }
    }
}
