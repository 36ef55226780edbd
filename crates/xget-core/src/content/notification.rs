//! Transient on-page notification shown by the content side.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

pub const REDIRECTED_MESSAGE: &str = "Download redirected through Xget";
pub const SETTINGS_UPDATED_MESSAGE: &str = "Settings updated! Click to refresh the page";

/// `showNotification` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub message: String,
    #[serde(default)]
    pub show_refresh_button: bool,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            show_refresh_button: false,
        }
    }

    pub fn redirected() -> Self {
        Self::new(REDIRECTED_MESSAGE)
    }

    pub fn settings_updated() -> Self {
        Self {
            message: SETTINGS_UPDATED_MESSAGE.to_string(),
            show_refresh_button: true,
        }
    }

    /// On-screen time: longer when the user has a button to press.
    pub fn display_duration(&self) -> Duration {
        if self.show_refresh_button {
            Duration::from_secs(8)
        } else {
            Duration::from_secs(4)
        }
    }

    /// Wire form: `{action: "showNotification", message, showRefreshButton}`.
    pub fn to_message(&self) -> Value {
        let mut v = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(m) = &mut v {
            m.insert("action".to_string(), Value::String("showNotification".into()));
        }
        v
    }

    /// Parse a `showNotification` message; `None` for any other action.
    pub fn from_message(message: &Value) -> Option<Self> {
        if message.get("action").and_then(Value::as_str) != Some("showNotification") {
            return None;
        }
        serde_json::from_value(message.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_roundtrip() {
        let n = Notification::settings_updated();
        let msg = n.to_message();
        assert_eq!(msg["action"], json!("showNotification"));
        assert_eq!(msg["showRefreshButton"], json!(true));
        assert_eq!(Notification::from_message(&msg), Some(n));
    }

    #[test]
    fn refresh_button_defaults_off() {
        let n = Notification::from_message(&json!({
            "action": "showNotification",
            "message": "hi"
        }))
        .unwrap();
        assert!(!n.show_refresh_button);
        assert_eq!(n.display_duration(), Duration::from_secs(4));
        assert_eq!(Notification::settings_updated().display_duration(), Duration::from_secs(8));
    }

    #[test]
    fn other_actions_rejected() {
        assert_eq!(Notification::from_message(&json!({ "action": "getSettings" })), None);
    }
}
