use super::*;
use crate::error::CompatError;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

fn chrome() -> BrowserFlavor {
    BrowserFlavor::detect("chrome-extension://x/", "Chrome/126.0", "1.0.0")
}

fn firefox() -> BrowserFlavor {
    BrowserFlavor::detect("moz-extension://x/", "Firefox/128.0", "1.0.0")
}

fn defaults() -> Map<String, Value> {
    json!({ "enabled": true, "xgetDomain": "d.example" })
        .as_object()
        .cloned()
        .unwrap()
}

/// Promise host that answers from a fixed script.
struct ScriptedPromise {
    present: HashSet<Capability>,
    reject: HashSet<Capability>,
    answer: Value,
}

#[async_trait]
impl PromiseApi for ScriptedPromise {
    fn has(&self, capability: Capability) -> bool {
        self.present.contains(&capability)
    }

    async fn call(&self, capability: Capability, _args: Vec<Value>) -> Result<Value, String> {
        if self.reject.contains(&capability) {
            Err(format!("{capability} exploded"))
        } else {
            Ok(self.answer.clone())
        }
    }
}

fn promise_ext(present: &[Capability], reject: &[Capability], answer: Value) -> WebExt {
    let api = ScriptedPromise {
        present: present.iter().copied().collect(),
        reject: reject.iter().copied().collect(),
        answer,
    };
    WebExt::new(NativeApi::Promise(Arc::new(api)), firefox())
}

/// Callback host that sets the last-error slot around the completion.
struct ScriptedCallback {
    fail_with: Option<String>,
    drop_completion: bool,
    answer: Value,
    last_error: Mutex<Option<String>>,
}

impl CallbackApi for ScriptedCallback {
    fn has(&self, capability: Capability) -> bool {
        !matches!(capability, Capability::StorageGet(StorageArea::Sync))
    }

    fn call(&self, _capability: Capability, _args: Vec<Value>, done: Completion) {
        if self.drop_completion {
            return;
        }
        *self.last_error.lock().unwrap() = self.fail_with.clone();
        done(self.answer.clone());
        *self.last_error.lock().unwrap() = None;
    }

    fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}

fn callback_ext(fail_with: Option<&str>, drop_completion: bool, answer: Value) -> WebExt {
    let api = ScriptedCallback {
        fail_with: fail_with.map(str::to_string),
        drop_completion,
        answer,
        last_error: Mutex::new(None),
    };
    WebExt::new(NativeApi::Callback(Arc::new(api)), chrome())
}

#[tokio::test]
async fn promise_storage_get_returns_stored_record() {
    let cap = Capability::StorageGet(StorageArea::Local);
    let ext = promise_ext(&[cap], &[], json!({ "enabled": false }));
    let out = ext.storage(StorageArea::Local).get(defaults()).await.unwrap();
    assert!(!out.is_recovered());
    assert_eq!(out.value().get("enabled"), Some(&json!(false)));
}

#[tokio::test]
async fn promise_storage_rejection_is_an_error() {
    let cap = Capability::StorageSet(StorageArea::Local);
    let ext = promise_ext(&[cap], &[cap], Value::Null);
    let err = ext
        .storage(StorageArea::Local)
        .set(defaults())
        .await
        .unwrap_err();
    match err {
        CompatError::Rejected { capability, message } => {
            assert_eq!(capability, cap);
            assert!(message.contains("exploded"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn promise_send_message_rejection_answers_null() {
    let cap = Capability::RuntimeSendMessage;
    let ext = promise_ext(&[cap], &[cap], json!({ "x": 1 }));
    let out = ext.send_message(json!({ "action": "getSettings" })).await;
    assert_eq!(out.value(), &Value::Null);
    assert!(matches!(out.recovery(), Some(Recovery::Rejected(_))));
}

#[tokio::test]
async fn promise_storage_non_object_payload_is_an_error() {
    let cap = Capability::StorageGet(StorageArea::Local);
    let ext = promise_ext(&[cap], &[], json!([1, 2]));
    let err = ext.storage(StorageArea::Local).get(defaults()).await.unwrap_err();
    assert!(matches!(err, CompatError::Payload { .. }));
}

#[tokio::test]
async fn missing_capabilities_answer_neutral_placeholders() {
    let ext = promise_ext(&[], &[], Value::Null);

    let got = ext.storage(StorageArea::Sync).get(defaults()).await.unwrap();
    assert_eq!(got.recovery(), Some(&Recovery::Unavailable));
    assert!(got.value().is_empty());

    let tabs = ext.tabs_query(&["https://github.com/*".to_string()]).await;
    assert!(tabs.value().is_empty());
    assert!(tabs.is_recovered());

    let sent = ext.tabs_send_message(1, json!({})).await;
    assert_eq!(sent.into_value(), Value::Null);

    let id = ext.download(&DownloadOptions::new("https://m.example/x")).await;
    assert_eq!(id.into_value(), None);

    assert_eq!(ext.storage(StorageArea::Local).bytes_in_use().await.into_value(), 0);
    assert!(ext.search_downloads(json!({})).await.into_value().is_empty());
    assert!(ext.cancel_download(3).await.is_recovered());
}

#[tokio::test]
async fn callback_success_resolves_value() {
    let ext = callback_ext(None, false, json!(42));
    let id = ext.download(&DownloadOptions::new("https://m.example/x")).await;
    assert_eq!(id, ApiOutcome::Value(Some(42)));
}

#[tokio::test]
async fn callback_last_error_falls_back_to_defaults() {
    let ext = callback_ext(Some("QUOTA_BYTES exceeded"), false, json!({ "enabled": false }));
    let got = ext.storage(StorageArea::Local).get(defaults()).await.unwrap();
    assert_eq!(
        got.recovery(),
        Some(&Recovery::LastError("QUOTA_BYTES exceeded".into()))
    );
    assert_eq!(got.value(), &defaults());

    // storage writes recover too: the callback family never rejects
    let set = ext.storage(StorageArea::Local).set(defaults()).await.unwrap();
    assert!(set.is_recovered());
}

#[tokio::test]
async fn callback_missing_area_is_unavailable() {
    let ext = callback_ext(None, false, json!({ "enabled": false }));
    let got = ext.storage(StorageArea::Sync).get(defaults()).await.unwrap();
    assert_eq!(got.recovery(), Some(&Recovery::Unavailable));
}

#[tokio::test]
async fn dropped_completion_is_abandoned() {
    let ext = callback_ext(None, true, Value::Null);
    let out = ext.send_message(json!({ "action": "getSettings" })).await;
    assert_eq!(out.recovery(), Some(&Recovery::Abandoned));
    assert_eq!(out.into_value(), Value::Null);
}

#[tokio::test]
async fn malformed_tabs_payload_recovers_empty() {
    let ext = callback_ext(None, false, json!({ "not": "a list" }));
    let tabs = ext.tabs_query(&[]).await;
    assert!(matches!(tabs.recovery(), Some(Recovery::Malformed(_))));
    assert!(tabs.value().is_empty());
}

#[test]
fn preferred_area_follows_flavor() {
    assert_eq!(promise_ext(&[], &[], Value::Null).preferred_storage_area(), StorageArea::Local);
    assert_eq!(callback_ext(None, false, Value::Null).preferred_storage_area(), StorageArea::Sync);
}

fn both_styles() -> (Option<Arc<dyn PromiseApi>>, Option<Arc<dyn CallbackApi>>) {
    let promise: Arc<dyn PromiseApi> = Arc::new(ScriptedPromise {
        present: HashSet::new(),
        reject: HashSet::new(),
        answer: Value::Null,
    });
    let callback: Arc<dyn CallbackApi> = Arc::new(ScriptedCallback {
        fail_with: None,
        drop_completion: false,
        answer: Value::Null,
        last_error: Mutex::new(None),
    });
    (Some(promise), Some(callback))
}

#[test]
fn detect_binds_promise_api_on_firefox_family() {
    let (p, c) = both_styles();
    let ext = WebExt::detect("moz-extension://x/", "Firefox/128.0", "1.0.0", p, c).unwrap();
    assert_eq!(ext.flavor().family, BrowserFamily::Firefox);
    assert_eq!(ext.native_style(), "promise");

    let (p, c) = both_styles();
    let ext = WebExt::detect("safari-web-extension://x/", "Version/17.0 Safari/605", "1.0.0", p, c)
        .unwrap();
    assert_eq!(ext.native_style(), "promise");
}

#[test]
fn detect_binds_callback_api_on_chromium_family() {
    for ua in ["Chrome/126.0", "Chrome/125.0 Edg/125.0", "Chrome/124.0 OPR/110.0"] {
        let (p, c) = both_styles();
        let ext = WebExt::detect("chrome-extension://x/", ua, "1.0.0", p, c).unwrap();
        assert!(ext.flavor().family.is_chromium());
        assert_eq!(ext.native_style(), "callback", "{ua}");
    }
}

#[test]
fn detect_falls_back_to_the_style_that_exists() {
    let (p, _) = both_styles();
    let ext = WebExt::detect("chrome-extension://x/", "Chrome/126.0", "1.0.0", p, None).unwrap();
    assert_eq!(ext.native_style(), "promise");

    let (_, c) = both_styles();
    let ext = WebExt::detect("moz-extension://x/", "Firefox/128.0", "1.0.0", None, c).unwrap();
    assert_eq!(ext.native_style(), "callback");
}

#[test]
fn detect_without_any_api_fails() {
    let err = WebExt::detect("moz-extension://x/", "Firefox/128.0", "1.0.0", None, None).unwrap_err();
    assert!(matches!(err, CompatError::NoNativeApi));
}
