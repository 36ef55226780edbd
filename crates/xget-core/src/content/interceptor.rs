//! Per-page interceptor: decides whether a clicked link goes through the mirror.

use serde_json::{json, Value};
use std::sync::Arc;

use super::rules::{classify_link, DownloadSignal, LinkInfo};
use super::Notification;
use crate::background::Request;
use crate::compat::WebExt;
use crate::platform;
use crate::settings::Settings;
use crate::transform::transform_url;

/// The page the interceptor runs in.
pub trait PageHost: Send + Sync {
    /// Current document URL.
    fn page_url(&self) -> String;

    /// Navigate the page, as assigning `window.location` would.
    fn navigate(&self, url: &str);

    /// Show `notification`, replacing any notification already on screen.
    fn show_notification(&self, notification: &Notification);
}

/// What happened to a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickDisposition {
    /// Default navigation left untouched.
    PassThrough,
    /// Default navigation suppressed; the page was sent to `url`.
    Redirected { url: String, signal: DownloadSignal },
}

pub struct ContentScript {
    api: WebExt,
    page: Arc<dyn PageHost>,
    platform: Option<&'static str>,
}

impl std::fmt::Debug for ContentScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentScript")
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl ContentScript {
    /// Load settings from the background side and decide whether this page is
    /// intercepted: the extension must be active and the page's platform
    /// enabled. The notification listener works either way.
    pub async fn activate(api: WebExt, page: Arc<dyn PageHost>) -> Self {
        let mut script = Self {
            api,
            page,
            platform: None,
        };
        let Some(settings) = script.fetch_settings().await else {
            tracing::debug!("no settings from background, interceptor stays inactive");
            return script;
        };
        if !settings.is_active() {
            return script;
        }
        let url = script.page.page_url();
        script.platform = platform::detect_platform(&url).filter(|k| settings.platform_enabled(k));
        if let Some(key) = script.platform {
            tracing::debug!(platform = key, "intercepting download links");
        }
        script
    }

    async fn fetch_settings(&self) -> Option<Settings> {
        let answer = self
            .api
            .send_message(Request::GetSettings.to_message())
            .await
            .into_value();
        if !answer.is_object() {
            return None;
        }
        serde_json::from_value(answer).ok()
    }

    pub fn is_active(&self) -> bool {
        self.platform.is_some()
    }

    /// Platform of the intercepted page.
    pub fn platform(&self) -> Option<&'static str> {
        self.platform
    }

    pub fn classify_click(&self, link: &LinkInfo) -> Option<DownloadSignal> {
        if !self.is_active() || link.href.is_empty() {
            return None;
        }
        classify_link(link)
    }

    /// Handle a click on an anchor. A classified link whose URL cannot be
    /// rewritten is passed through rather than swallowed.
    pub async fn handle_click(&self, link: &LinkInfo) -> ClickDisposition {
        let Some(signal) = self.classify_click(link) else {
            return ClickDisposition::PassThrough;
        };
        let Some(settings) = self.fetch_settings().await.filter(Settings::is_active) else {
            return ClickDisposition::PassThrough;
        };
        let Some(url) = transform_url(&link.href, &settings.mirror_domain, &settings.enabled_platforms)
        else {
            return ClickDisposition::PassThrough;
        };
        tracing::info!(?signal, "redirecting link {} -> {}", link.href, url);
        self.page.show_notification(&Notification::redirected());
        self.page.navigate(&url);
        ClickDisposition::Redirected { url, signal }
    }

    /// Runtime messages addressed to the page.
    pub fn handle_message(&self, message: &Value) -> Option<Value> {
        let notification = Notification::from_message(message)?;
        self.page.show_notification(&notification);
        Some(json!({ "success": true }))
    }

    /// DOM mutation hook. Nothing to do: the click listener is on the
    /// document and sees links added later.
    pub fn on_mutation(&self) {}
}
