//! In-memory promise-style host with failure switches and call recording.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use xget_core::background::BackgroundHandle;
use xget_core::compat::{Capability, PromiseApi, StorageArea, TabInfo};

/// How `runtime.sendMessage` answers.
#[derive(Debug, Clone, Default)]
pub enum Runtime {
    /// Capability missing.
    #[default]
    Absent,
    Fixed(Value),
    Delayed(Duration, Value),
    Background(BackgroundHandle),
}

#[derive(Debug, Default)]
pub struct FakeHost {
    pub storage: Mutex<HashMap<StorageArea, Map<String, Value>>>,
    /// Areas the host does not have at all.
    pub missing_areas: Mutex<HashSet<StorageArea>>,
    /// Areas whose calls reject.
    pub failing_areas: Mutex<HashSet<StorageArea>>,
    pub tabs: Mutex<Vec<TabInfo>>,
    /// Tabs without a content script: sendMessage rejects.
    pub deaf_tabs: Mutex<HashSet<i64>>,
    pub fail_cancel: Mutex<bool>,
    pub runtime: Mutex<Runtime>,

    pub tab_queries: Mutex<Vec<Value>>,
    pub tab_messages: Mutex<Vec<(i64, Value)>>,
    pub cancelled: Mutex<Vec<i64>>,
    pub downloads: Mutex<Vec<Value>>,
    pub runtime_messages: Mutex<Vec<Value>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(self, area: StorageArea, record: Value) -> Self {
        if let Value::Object(m) = record {
            self.storage.lock().unwrap().insert(area, m);
        }
        self
    }

    pub fn with_tabs(self, tabs: &[(i64, &str)]) -> Self {
        *self.tabs.lock().unwrap() = tabs
            .iter()
            .map(|(id, url)| TabInfo {
                id: *id,
                url: Some(url.to_string()),
            })
            .collect();
        self
    }

    pub fn with_runtime(self, runtime: Runtime) -> Self {
        *self.runtime.lock().unwrap() = runtime;
        self
    }

    pub fn fail_area(&self, area: StorageArea) {
        self.failing_areas.lock().unwrap().insert(area);
    }

    pub fn remove_area(&self, area: StorageArea) {
        self.missing_areas.lock().unwrap().insert(area);
    }

    pub fn record(&self, area: StorageArea) -> Map<String, Value> {
        self.storage
            .lock()
            .unwrap()
            .get(&area)
            .cloned()
            .unwrap_or_default()
    }

    fn storage_call(&self, capability: Capability, area: StorageArea, args: Vec<Value>) -> Result<Value, String> {
        if self.failing_areas.lock().unwrap().contains(&area) {
            return Err(format!("{capability}: storage is broken"));
        }
        let mut storage = self.storage.lock().unwrap();
        let stored = storage.entry(area).or_default();
        match capability {
            Capability::StorageGet(_) => {
                let mut out = args
                    .first()
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                let keys: Vec<String> = out.keys().cloned().collect();
                for key in keys {
                    if let Some(v) = stored.get(&key) {
                        out.insert(key, v.clone());
                    }
                }
                Ok(Value::Object(out))
            }
            Capability::StorageSet(_) => {
                if let Some(items) = args.first().and_then(Value::as_object) {
                    for (k, v) in items {
                        stored.insert(k.clone(), v.clone());
                    }
                }
                Ok(Value::Null)
            }
            Capability::StorageRemove(_) => {
                for key in args.first().and_then(Value::as_array).into_iter().flatten() {
                    if let Some(key) = key.as_str() {
                        stored.remove(key);
                    }
                }
                Ok(Value::Null)
            }
            Capability::StorageClear(_) => {
                stored.clear();
                Ok(Value::Null)
            }
            _ => Ok(json!(Value::Object(stored.clone()).to_string().len())),
        }
    }
}

fn area_of(capability: Capability) -> Option<StorageArea> {
    match capability {
        Capability::StorageGet(a)
        | Capability::StorageSet(a)
        | Capability::StorageRemove(a)
        | Capability::StorageClear(a)
        | Capability::StorageBytesInUse(a) => Some(a),
        _ => None,
    }
}

#[async_trait]
impl PromiseApi for FakeHost {
    fn has(&self, capability: Capability) -> bool {
        if let Some(area) = area_of(capability) {
            return !self.missing_areas.lock().unwrap().contains(&area);
        }
        match capability {
            Capability::RuntimeSendMessage => !matches!(*self.runtime.lock().unwrap(), Runtime::Absent),
            _ => true,
        }
    }

    async fn call(&self, capability: Capability, args: Vec<Value>) -> Result<Value, String> {
        if let Some(area) = area_of(capability) {
            return self.storage_call(capability, area, args);
        }
        match capability {
            Capability::RuntimeSendMessage => {
                let message = args.into_iter().next().unwrap_or_default();
                self.runtime_messages.lock().unwrap().push(message.clone());
                let runtime = self.runtime.lock().unwrap().clone();
                match runtime {
                    Runtime::Absent => Err("no receiving end".into()),
                    Runtime::Fixed(v) => Ok(v),
                    Runtime::Delayed(d, v) => {
                        tokio::time::sleep(d).await;
                        Ok(v)
                    }
                    Runtime::Background(handle) => Ok(handle.send_message(message).await),
                }
            }
            Capability::TabsQuery => {
                self.tab_queries
                    .lock()
                    .unwrap()
                    .push(args.first().cloned().unwrap_or_default());
                Ok(serde_json::to_value(&*self.tabs.lock().unwrap()).unwrap())
            }
            Capability::TabsSendMessage => {
                let tab_id = args.first().and_then(Value::as_i64).unwrap_or(-1);
                if self.deaf_tabs.lock().unwrap().contains(&tab_id) {
                    return Err("Could not establish connection. Receiving end does not exist.".into());
                }
                let message = args.get(1).cloned().unwrap_or_default();
                self.tab_messages.lock().unwrap().push((tab_id, message));
                Ok(json!({ "success": true }))
            }
            Capability::DownloadsCancel => {
                if *self.fail_cancel.lock().unwrap() {
                    return Err("Download must be in progress".into());
                }
                let id = args.first().and_then(Value::as_i64).unwrap_or(-1);
                self.cancelled.lock().unwrap().push(id);
                Ok(Value::Null)
            }
            Capability::DownloadsDownload => {
                let mut downloads = self.downloads.lock().unwrap();
                downloads.push(args.first().cloned().unwrap_or_default());
                Ok(json!(100 + downloads.len() as i64))
            }
            Capability::DownloadsSearch => Ok(json!([])),
            _ => Err(format!("{capability} not scripted")),
        }
    }
}
