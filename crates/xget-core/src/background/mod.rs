//! Background coordinator.
//!
//! Owns the settings record, answers `getSettings`/`saveSettings`, and turns
//! download-start events for enabled platforms into mirror downloads.

mod download;
mod event_loop;
mod messages;

pub use download::{DownloadItem, DownloadOutcome, Suggest};
pub use event_loop::{channel, run, BackgroundEvent, BackgroundHandle, EventReceiver};
pub use messages::{Request, SaveResponse};

use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::compat::{Capability, StorageArea, WebExt};
use crate::content::Notification;
use crate::error::CompatError;
use crate::platform;
use crate::settings::Settings;

#[derive(Debug)]
pub struct Coordinator {
    api: WebExt,
    defaults: Settings,
    area: StorageArea,
    /// Set once install has had to write to local storage instead of `area`.
    local_fallback: AtomicBool,
}

impl Coordinator {
    /// Settings live in the host's preferred area, or local storage when the
    /// host does not have it.
    pub fn new(api: WebExt, defaults: Settings) -> Self {
        let preferred = api.preferred_storage_area();
        let area = if api.has(Capability::StorageGet(preferred)) {
            preferred
        } else {
            StorageArea::Local
        };
        tracing::debug!(area = area.as_str(), "settings storage area selected");
        Self {
            api,
            defaults,
            area,
            local_fallback: AtomicBool::new(false),
        }
    }

    pub fn api(&self) -> &WebExt {
        &self.api
    }

    /// Area settings are read from and written to.
    pub fn storage_area(&self) -> StorageArea {
        if self.local_fallback.load(Ordering::Acquire) {
            StorageArea::Local
        } else {
            self.area
        }
    }

    pub fn defaults(&self) -> &Settings {
        &self.defaults
    }

    /// Stored settings merged over defaults. Never fails: any storage error
    /// is logged and the defaults are returned.
    pub async fn load_settings(&self) -> Settings {
        let area = self.storage_area();
        match self.read_from(area).await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(area = area.as_str(), "settings read failed: {e}");
                self.defaults.clone()
            }
        }
    }

    async fn read_from(&self, area: StorageArea) -> Result<Settings, CompatError> {
        let out = self
            .api
            .storage(area)
            .get(self.defaults.to_record())
            .await?;
        Ok(Settings::merged_over(&self.defaults, out.value()))
    }

    /// Persist `settings` verbatim.
    pub async fn save_settings(&self, settings: &Settings) -> Result<(), CompatError> {
        let area = self.storage_area();
        let out = self.api.storage(area).set(settings.to_record()).await?;
        if let Some(reason) = out.recovery() {
            tracing::warn!(area = area.as_str(), ?reason, "settings write not confirmed");
        }
        Ok(())
    }

    /// Install/update hook: merge whatever is stored over the defaults and
    /// write the result back, retrying once against local storage. After a
    /// successful retry, later loads and saves use local storage too.
    pub async fn on_installed(&self) -> Settings {
        let area = self.storage_area();
        match self.initialize_in(area).await {
            Ok(s) => s,
            Err(e) if area != StorageArea::Local => {
                tracing::warn!(area = area.as_str(), "settings init failed, retrying in local storage: {e}");
                match self.initialize_in(StorageArea::Local).await {
                    Ok(s) => {
                        self.local_fallback.store(true, Ordering::Release);
                        s
                    }
                    Err(e) => {
                        tracing::warn!("settings init failed in local storage: {e}");
                        self.defaults.clone()
                    }
                }
            }
            Err(e) => {
                tracing::warn!("settings init failed: {e}");
                self.defaults.clone()
            }
        }
    }

    /// An unreadable record is replaced by the defaults.
    async fn initialize_in(&self, area: StorageArea) -> Result<Settings, CompatError> {
        let merged = match self.read_from(area).await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(area = area.as_str(), "stored settings unreadable, writing defaults: {e}");
                self.defaults.clone()
            }
        };
        self.api.storage(area).set(merged.to_record()).await?;
        tracing::info!(area = area.as_str(), "settings initialized");
        Ok(merged)
    }

    /// Answer one runtime message. `None` for actions handled elsewhere.
    pub async fn handle_message(&self, message: &Value) -> Option<Value> {
        match Request::from_message(message)? {
            Request::GetSettings => {
                let settings = self.load_settings().await;
                Some(Value::Object(settings.to_record()))
            }
            Request::SaveSettings { settings } => {
                let response = match self.save_settings(&settings).await {
                    Ok(()) => {
                        self.notify_settings_changed().await;
                        SaveResponse::ok()
                    }
                    Err(e) => {
                        tracing::warn!("saving settings failed: {e}");
                        SaveResponse::failed(e.to_string())
                    }
                };
                Some(serde_json::to_value(response).unwrap_or(Value::Null))
            }
        }
    }

    /// Ask every tab on a known platform to show the refresh banner. Returns
    /// how many tabs acknowledged.
    pub async fn notify_settings_changed(&self) -> usize {
        let tabs = self.api.tabs_query(&platform::tab_url_patterns()).await;
        let message = Notification::settings_updated().to_message();
        let mut acknowledged = 0;
        for tab in tabs.value() {
            let out = self.api.tabs_send_message(tab.id, message.clone()).await;
            if out.is_recovered() {
                tracing::debug!(tab_id = tab.id, "tab did not take the settings notification");
            } else {
                acknowledged += 1;
            }
        }
        acknowledged
    }

    /// Download-start hook. `suggest` is acknowledged before this returns;
    /// the redirect decision runs on a spawned task.
    pub fn on_determining_filename(
        self: &Arc<Self>,
        item: DownloadItem,
        suggest: Suggest,
    ) -> JoinHandle<DownloadOutcome> {
        suggest.acknowledge();
        let this = Arc::clone(self);
        tokio::spawn(async move { this.process_download(&item).await })
    }
}
