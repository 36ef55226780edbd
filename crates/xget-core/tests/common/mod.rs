//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod fake_host;

use std::sync::Arc;

use xget_core::compat::{BrowserFlavor, NativeApi, PromiseApi, WebExt};

pub use fake_host::{FakeHost, Runtime};

pub const CHROME_UA: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
pub const FIREFOX_UA: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

pub fn chrome() -> BrowserFlavor {
    BrowserFlavor::detect("chrome-extension://xget/", CHROME_UA, "1.0.0")
}

pub fn firefox() -> BrowserFlavor {
    BrowserFlavor::detect("moz-extension://xget/", FIREFOX_UA, "1.0.0")
}

pub fn webext(host: &Arc<FakeHost>, flavor: BrowserFlavor) -> WebExt {
    let api: Arc<dyn PromiseApi> = Arc::<FakeHost>::clone(host);
    WebExt::new(NativeApi::Promise(api), flavor)
}
