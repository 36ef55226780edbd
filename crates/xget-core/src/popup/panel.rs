//! Popup controller: loads settings over the message channel, applies user
//! edits to the form and saves the whole object after each change.

use serde_json::Value;
use std::time::Duration;

use super::{SettingsForm, Status};
use crate::background::{Request, SaveResponse};
use crate::compat::WebExt;
use crate::error::FormError;
use crate::settings::{is_valid_domain, Settings};

pub const LOAD_TIMEOUT_MESSAGE: &str = "Settings loading timed out, please try again";
pub const USING_DEFAULTS_MESSAGE: &str = "Using default settings, please configure a domain";
pub const CONFIGURE_DOMAIN_MESSAGE: &str = "Please configure your Xget domain";
pub const DOMAIN_CLEARED_MESSAGE: &str = "Extension disabled: domain cleared";
pub const INVALID_DOMAIN_MESSAGE: &str = "Invalid domain format";
pub const SAVED_MESSAGE: &str = "Settings saved! Use the refresh button in the page notification";
pub const UNCONFIRMED_MESSAGE: &str = "Settings may have been saved, but could not be confirmed";

#[derive(Debug)]
pub struct SettingsPanel {
    api: WebExt,
    form: SettingsForm,
    status: Option<Status>,
}

impl SettingsPanel {
    /// Ask the background side for settings, giving up after `load_timeout`.
    /// A timeout or a malformed answer leaves the form on its fallback state
    /// with an error status.
    pub async fn load(api: WebExt, load_timeout: Duration) -> Self {
        let request = api.send_message(Request::GetSettings.to_message());
        let (form, status) = match tokio::time::timeout(load_timeout, request).await {
            Err(_) => {
                tracing::warn!(?load_timeout, "settings load timed out");
                (SettingsForm::fallback(), Some(Status::error(LOAD_TIMEOUT_MESSAGE)))
            }
            Ok(answer) => match answer.into_value() {
                Value::Object(record) => {
                    let mut base = Settings::with_domain("");
                    base.enabled = false;
                    let settings = Settings::merged_over(&base, &record);
                    let status = (settings.enabled && settings.mirror_domain.is_empty())
                        .then(|| Status::error(CONFIGURE_DOMAIN_MESSAGE));
                    (SettingsForm::from_settings(&settings), status)
                }
                _ => (SettingsForm::fallback(), Some(Status::error(USING_DEFAULTS_MESSAGE))),
            },
        };
        Self { api, form, status }
    }

    pub fn form(&self) -> &SettingsForm {
        &self.form
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// The enable switch. Refused without a domain, in which case nothing is
    /// saved.
    pub async fn toggle_enabled(&mut self, on: bool) -> Status {
        if let Err(e) = self.form.set_enabled(on) {
            return self.set_status(Status::error(e.to_string()));
        }
        self.save().await
    }

    /// Domain input. Clearing it switches the extension off before saving.
    pub async fn change_domain(&mut self, domain: &str) -> Status {
        let cleared = self.form.set_domain(domain);
        let saved = self.save().await;
        if cleared {
            return self.set_status(Status::error(DOMAIN_CLEARED_MESSAGE));
        }
        saved
    }

    /// Domain input lost focus: flag a malformed domain without blocking.
    pub fn blur_domain(&mut self) -> Option<Status> {
        let domain = self.form.domain().trim();
        if !domain.is_empty() && !is_valid_domain(domain) {
            return Some(self.set_status(Status::error(INVALID_DOMAIN_MESSAGE)));
        }
        None
    }

    pub async fn toggle_platform(&mut self, key: &str, on: bool) -> Result<Status, FormError> {
        self.form.set_platform(key, on)?;
        Ok(self.save().await)
    }

    /// Send the full settings object to the background side.
    pub async fn save(&mut self) -> Status {
        let settings = match self.form.to_settings() {
            Ok(s) => s,
            Err(e) => {
                self.form.disable();
                return self.set_status(Status::error(e.to_string()));
            }
        };
        let answer = self
            .api
            .send_message(Request::SaveSettings { settings }.to_message())
            .await
            .into_value();
        let confirmed = serde_json::from_value::<SaveResponse>(answer)
            .map(|r| r.success)
            .unwrap_or(false);
        let status = if confirmed {
            Status::success(SAVED_MESSAGE)
        } else {
            Status::warning(UNCONFIRMED_MESSAGE)
        };
        self.set_status(status)
    }

    fn set_status(&mut self, status: Status) -> Status {
        self.status = Some(status.clone());
        status
    }
}
