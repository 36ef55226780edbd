//! Uniform async surface over whichever native API the host provides.

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tokio::sync::oneshot;

use std::sync::Arc;

use super::{
    ApiOutcome, BrowserFlavor, CallbackApi, Capability, DownloadOptions, NativeApi, PromiseApi,
    Recovery, StorageArea, TabInfo,
};
use crate::error::CompatError;

/// What a single native call produced, before the recovery policy applies.
enum RawOutcome {
    Value(Value),
    Unavailable,
    LastError(String),
    Rejected(String),
    Abandoned,
}

/// The extension API as the rest of the crate sees it.
///
/// Built once at startup from the detected native API. Every method exists
/// regardless of what the host supports: missing capabilities resolve to a
/// neutral placeholder, and failures resolve to a default marked as
/// recovered. Only storage calls on a promise-style host surface a
/// rejection as an error.
#[derive(Debug, Clone)]
pub struct WebExt {
    native: NativeApi,
    flavor: BrowserFlavor,
}

impl WebExt {
    pub fn new(native: NativeApi, flavor: BrowserFlavor) -> Self {
        tracing::debug!(
            family = flavor.family.as_str(),
            version = flavor.major_version,
            mobile = flavor.mobile,
            dev_build = flavor.dev_build,
            style = native.style(),
            "extension api initialized"
        );
        Self { native, flavor }
    }

    /// Detect the host and bind the matching native API, once at startup.
    ///
    /// `promise` and `callback` are the API objects the host exposes, if any.
    pub fn detect(
        extension_url: &str,
        user_agent: &str,
        manifest_version: &str,
        promise: Option<Arc<dyn PromiseApi>>,
        callback: Option<Arc<dyn CallbackApi>>,
    ) -> Result<Self, CompatError> {
        let flavor = BrowserFlavor::detect(extension_url, user_agent, manifest_version);
        let native =
            NativeApi::select(flavor.family, promise, callback).ok_or(CompatError::NoNativeApi)?;
        Ok(Self::new(native, flavor))
    }

    pub fn native_style(&self) -> &'static str {
        self.native.style()
    }

    pub fn flavor(&self) -> &BrowserFlavor {
        &self.flavor
    }

    pub fn preferred_storage_area(&self) -> StorageArea {
        self.flavor.preferred_storage_area()
    }

    /// Whether the host exposes `capability` at all.
    pub fn has(&self, capability: Capability) -> bool {
        self.native.has(capability)
    }

    async fn invoke(&self, capability: Capability, args: Vec<Value>) -> RawOutcome {
        if !self.native.has(capability) {
            return RawOutcome::Unavailable;
        }
        match &self.native {
            NativeApi::Promise(api) => match api.call(capability, args).await {
                Ok(v) => RawOutcome::Value(v),
                Err(e) => RawOutcome::Rejected(e),
            },
            NativeApi::Callback(api) => {
                let (tx, rx) = oneshot::channel();
                let slot = Arc::clone(api);
                api.call(
                    capability,
                    args,
                    Box::new(move |result| {
                        // last-error is only valid while the completion runs
                        let outcome = match slot.last_error() {
                            Some(e) => RawOutcome::LastError(e),
                            None => RawOutcome::Value(result),
                        };
                        let _ = tx.send(outcome);
                    }),
                );
                rx.await.unwrap_or(RawOutcome::Abandoned)
            }
        }
    }

    fn settle(capability: Capability, raw: RawOutcome, fallback: Value) -> ApiOutcome<Value> {
        match raw {
            RawOutcome::Value(v) => ApiOutcome::Value(v),
            RawOutcome::Unavailable => {
                tracing::debug!(%capability, "capability unavailable, using placeholder");
                ApiOutcome::recovered(capability.neutral_value(), Recovery::Unavailable)
            }
            RawOutcome::LastError(e) => {
                tracing::warn!(%capability, "host reported error: {e}");
                ApiOutcome::recovered(fallback, Recovery::LastError(e))
            }
            RawOutcome::Rejected(e) => {
                tracing::warn!(%capability, "host call rejected: {e}");
                ApiOutcome::recovered(fallback, Recovery::Rejected(e))
            }
            RawOutcome::Abandoned => {
                tracing::warn!(%capability, "host dropped completion callback");
                ApiOutcome::recovered(fallback, Recovery::Abandoned)
            }
        }
    }

    /// Best-effort call: every failure resolves to `fallback`.
    async fn call_or(
        &self,
        capability: Capability,
        args: Vec<Value>,
        fallback: Value,
    ) -> ApiOutcome<Value> {
        let raw = self.invoke(capability, args).await;
        Self::settle(capability, raw, fallback)
    }

    /// Like `call_or`, but a promise rejection is returned as an error.
    async fn call_actionable(
        &self,
        capability: Capability,
        args: Vec<Value>,
        fallback: Value,
    ) -> Result<ApiOutcome<Value>, CompatError> {
        match self.invoke(capability, args).await {
            RawOutcome::Rejected(message) if capability.is_actionable() => Err(CompatError::Rejected {
                capability,
                message,
            }),
            raw => Ok(Self::settle(capability, raw, fallback)),
        }
    }

    fn decode<T: DeserializeOwned>(
        capability: Capability,
        outcome: ApiOutcome<Value>,
        fallback: impl FnOnce() -> T,
    ) -> ApiOutcome<T> {
        match outcome {
            ApiOutcome::Value(v) => match serde_json::from_value(v) {
                Ok(t) => ApiOutcome::Value(t),
                Err(e) => {
                    tracing::warn!(%capability, "unexpected payload: {e}");
                    ApiOutcome::recovered(fallback(), Recovery::Malformed(e.to_string()))
                }
            },
            ApiOutcome::Recovered { value, reason } => {
                let t = serde_json::from_value(value).unwrap_or_else(|_| fallback());
                ApiOutcome::recovered(t, reason)
            }
        }
    }

    /// `runtime.sendMessage`. A failed or missing channel answers `null`.
    pub async fn send_message(&self, message: Value) -> ApiOutcome<Value> {
        self.call_or(Capability::RuntimeSendMessage, vec![message], Value::Null)
            .await
    }

    /// Handle for one storage area.
    pub fn storage(&self, area: StorageArea) -> Storage<'_> {
        Storage { ext: self, area }
    }

    /// `tabs.query({ url: patterns })`.
    pub async fn tabs_query(&self, url_patterns: &[String]) -> ApiOutcome<Vec<TabInfo>> {
        let cap = Capability::TabsQuery;
        let out = self
            .call_or(cap, vec![json!({ "url": url_patterns })], cap.neutral_value())
            .await;
        Self::decode(cap, out, Vec::new)
    }

    /// `tabs.sendMessage(tabId, message)`. Failure answers `null`.
    pub async fn tabs_send_message(&self, tab_id: i64, message: Value) -> ApiOutcome<Value> {
        self.call_or(
            Capability::TabsSendMessage,
            vec![json!(tab_id), message],
            Value::Null,
        )
        .await
    }

    /// `downloads.download(options)`; resolves to the new download id when known.
    pub async fn download(&self, options: &DownloadOptions) -> ApiOutcome<Option<i64>> {
        let cap = Capability::DownloadsDownload;
        let args = match serde_json::to_value(options) {
            Ok(v) => vec![v],
            Err(e) => {
                return ApiOutcome::recovered(None, Recovery::Malformed(e.to_string()));
            }
        };
        let out = self.call_or(cap, args, Value::Null).await;
        Self::decode(cap, out, || None)
    }

    /// `downloads.cancel(id)`.
    pub async fn cancel_download(&self, download_id: i64) -> ApiOutcome<()> {
        self.call_or(
            Capability::DownloadsCancel,
            vec![json!(download_id)],
            Value::Null,
        )
        .await
        .map(|_| ())
    }

    /// `downloads.search(query)`.
    pub async fn search_downloads(&self, query: Value) -> ApiOutcome<Vec<Value>> {
        let cap = Capability::DownloadsSearch;
        let out = self.call_or(cap, vec![query], cap.neutral_value()).await;
        Self::decode(cap, out, Vec::new)
    }
}

/// One storage area (`storage.local` or `storage.sync`).
pub struct Storage<'a> {
    ext: &'a WebExt,
    area: StorageArea,
}

impl Storage<'_> {
    pub fn area(&self) -> StorageArea {
        self.area
    }

    /// `get(defaults)`: stored values with `defaults` filling the gaps.
    ///
    /// A callback-style failure resolves to `defaults`; a missing area
    /// resolves to `{}`.
    pub async fn get(
        &self,
        defaults: Map<String, Value>,
    ) -> Result<ApiOutcome<Map<String, Value>>, CompatError> {
        let cap = Capability::StorageGet(self.area);
        let fallback = Value::Object(defaults.clone());
        let out = self
            .ext
            .call_actionable(cap, vec![Value::Object(defaults.clone())], fallback)
            .await?;
        match out {
            ApiOutcome::Value(Value::Object(m)) => Ok(ApiOutcome::Value(m)),
            ApiOutcome::Value(Value::Null) => Ok(ApiOutcome::Value(defaults)),
            ApiOutcome::Value(other) => Err(CompatError::Payload {
                capability: cap,
                source: serde::de::Error::custom(format!("expected object, got {other}")),
            }),
            ApiOutcome::Recovered { value, reason } => {
                let m = match value {
                    Value::Object(m) => m,
                    _ => Map::new(),
                };
                Ok(ApiOutcome::recovered(m, reason))
            }
        }
    }

    pub async fn set(&self, items: Map<String, Value>) -> Result<ApiOutcome<()>, CompatError> {
        let cap = Capability::StorageSet(self.area);
        let out = self
            .ext
            .call_actionable(cap, vec![Value::Object(items)], Value::Null)
            .await?;
        Ok(out.map(|_| ()))
    }

    pub async fn remove(&self, keys: &[&str]) -> Result<ApiOutcome<()>, CompatError> {
        let cap = Capability::StorageRemove(self.area);
        let out = self
            .ext
            .call_actionable(cap, vec![json!(keys)], Value::Null)
            .await?;
        Ok(out.map(|_| ()))
    }

    pub async fn clear(&self) -> Result<ApiOutcome<()>, CompatError> {
        let cap = Capability::StorageClear(self.area);
        let out = self.ext.call_actionable(cap, Vec::new(), Value::Null).await?;
        Ok(out.map(|_| ()))
    }

    /// Bytes used by the area; 0 when unknown.
    pub async fn bytes_in_use(&self) -> ApiOutcome<u64> {
        let cap = Capability::StorageBytesInUse(self.area);
        let out = self.ext.call_or(cap, vec![Value::Null], json!(0)).await;
        WebExt::decode(cap, out, || 0)
    }
}
