//! The two native host API families the shim normalizes.
//!
//! Firefox-family hosts return a promise from every call; Chromium-family
//! hosts take a completion callback and report failure through an
//! out-of-band last-error slot that is only meaningful inside the callback.
//! Arguments and results travel as JSON values, the way the host passes them.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::{BrowserFamily, Capability};

/// Promise-returning host API (the `browser.*` shape).
#[async_trait]
pub trait PromiseApi: Send + Sync {
    /// Whether the capability exists on this host at all.
    fn has(&self, capability: Capability) -> bool;

    /// Invoke the capability; `Err` carries the rejection message.
    async fn call(&self, capability: Capability, args: Vec<Value>) -> Result<Value, String>;
}

/// Completion callback handed to a callback-style call.
pub type Completion = Box<dyn FnOnce(Value) + Send + 'static>;

/// Callback-style host API (the `chrome.*` shape).
pub trait CallbackApi: Send + Sync {
    fn has(&self, capability: Capability) -> bool;

    /// Start the call; the host invokes `done` once it completes.
    fn call(&self, capability: Capability, args: Vec<Value>, done: Completion);

    /// Error recorded for the call whose completion is currently running.
    fn last_error(&self) -> Option<String>;
}

/// The native API object selected once at startup.
#[derive(Clone)]
pub enum NativeApi {
    Promise(Arc<dyn PromiseApi>),
    Callback(Arc<dyn CallbackApi>),
}

impl NativeApi {
    pub fn has(&self, capability: Capability) -> bool {
        match self {
            NativeApi::Promise(api) => api.has(capability),
            NativeApi::Callback(api) => api.has(capability),
        }
    }

    /// Pick the backend for `family`, falling back to whichever style the
    /// host actually provides.
    pub fn select(
        family: BrowserFamily,
        promise: Option<Arc<dyn PromiseApi>>,
        callback: Option<Arc<dyn CallbackApi>>,
    ) -> Option<Self> {
        match (promise, callback) {
            (Some(p), Some(c)) => Some(if family.prefers_promises() {
                NativeApi::Promise(p)
            } else {
                NativeApi::Callback(c)
            }),
            (Some(p), None) => Some(NativeApi::Promise(p)),
            (None, Some(c)) => Some(NativeApi::Callback(c)),
            (None, None) => None,
        }
    }

    pub fn style(&self) -> &'static str {
        match self {
            NativeApi::Promise(_) => "promise",
            NativeApi::Callback(_) => "callback",
        }
    }
}

impl std::fmt::Debug for NativeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NativeApi::{}", self.style())
    }
}
