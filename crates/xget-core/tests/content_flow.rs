//! Integration tests: content interceptor talking to a live background loop.

mod common;

use serde_json::json;
use std::sync::{Arc, Mutex};

use common::{FakeHost, Runtime};
use xget_core::background::{self, Coordinator};
use xget_core::compat::StorageArea;
use xget_core::content::{
    classify_link, ClickDisposition, ContentScript, DownloadSignal, LinkInfo, Notification, PageHost,
};
use xget_core::settings::Settings;

#[derive(Default)]
struct Page {
    url: String,
    navigated: Mutex<Vec<String>>,
    shown: Mutex<Vec<Notification>>,
}

impl PageHost for Page {
    fn page_url(&self) -> String {
        self.url.clone()
    }

    fn navigate(&self, url: &str) {
        self.navigated.lock().unwrap().push(url.to_string());
    }

    fn show_notification(&self, notification: &Notification) {
        self.shown.lock().unwrap().push(notification.clone());
    }
}

fn page(url: &str) -> Arc<Page> {
    Arc::new(Page {
        url: url.to_string(),
        ..Page::default()
    })
}

/// Background coordinator over `storage`, and a content-side host whose
/// runtime channel reaches it.
fn wire(storage: serde_json::Value) -> Arc<FakeHost> {
    let background_host = Arc::new(FakeHost::new().with_record(StorageArea::Local, storage));
    let coord = Arc::new(Coordinator::new(
        common::webext(&background_host, common::firefox()),
        Settings::default(),
    ));
    let (handle, rx) = background::channel(8);
    tokio::spawn(background::run(coord, rx));
    Arc::new(FakeHost::new().with_runtime(Runtime::Background(handle)))
}

#[test]
fn wheel_link_on_package_index_is_a_download() {
    let link = LinkInfo::new("https://pypi.org/packages/py3/x/x-1.0-py3-none-any.whl");
    assert!(classify_link(&link).is_some());
}

#[test]
fn bare_releases_link_on_code_host_is_not_a_download() {
    let link = LinkInfo::new("https://github.com/owner/repo/releases").with_text("Releases");
    assert_eq!(classify_link(&link), None);
}

#[tokio::test]
async fn click_on_release_asset_navigates_to_mirror() {
    let content_host = wire(json!({ "enabled": true, "xgetDomain": "mirror.example" }));
    let p = page("https://github.com/owner/repo/releases/tag/v1");
    let script = ContentScript::activate(common::webext(&content_host, common::chrome()), p.clone()).await;
    assert!(script.is_active());

    let link = LinkInfo::new("https://github.com/owner/repo/releases/download/v1/tool");
    let out = script.handle_click(&link).await;
    assert_eq!(
        out,
        ClickDisposition::Redirected {
            url: "https://mirror.example/gh/owner/repo/releases/download/v1/tool".into(),
            signal: DownloadSignal::HostRule("release-assets"),
        }
    );
    assert_eq!(
        *p.navigated.lock().unwrap(),
        vec!["https://mirror.example/gh/owner/repo/releases/download/v1/tool".to_string()]
    );
    assert_eq!(p.shown.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn disabled_platform_page_is_not_intercepted() {
    let content_host = wire(json!({
        "enabled": true,
        "xgetDomain": "mirror.example",
        "enabledPlatforms": { "hf": false }
    }));
    let p = page("https://huggingface.co/org/model");
    let script = ContentScript::activate(common::webext(&content_host, common::chrome()), p.clone()).await;
    assert!(!script.is_active());
    let link = LinkInfo::new("https://huggingface.co/org/model/resolve/main/w.bin");
    assert_eq!(script.handle_click(&link).await, ClickDisposition::PassThrough);
    assert!(p.navigated.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_runtime_leaves_page_alone() {
    let content_host = Arc::new(FakeHost::new());
    let p = page("https://github.com/a/b");
    let script = ContentScript::activate(common::webext(&content_host, common::chrome()), p).await;
    assert!(!script.is_active());
}
