//! Host API for running the extension components outside a browser.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Mutex;

use super::FileStore;
use crate::background::BackgroundHandle;
use crate::compat::{Capability, DownloadOptions, PromiseApi, StorageArea};

/// Promise-style host with a file-backed local storage area, an in-memory
/// download list and, when attached, a runtime channel to the background
/// side. There is no sync area and no tabs.
#[derive(Debug)]
pub struct LocalHost {
    store: FileStore,
    runtime: Option<BackgroundHandle>,
    downloads: Mutex<Vec<Value>>,
}

impl LocalHost {
    pub fn new(store: FileStore) -> Self {
        Self {
            store,
            runtime: None,
            downloads: Mutex::new(Vec::new()),
        }
    }

    /// Route `runtime.sendMessage` to the background loop behind `handle`.
    pub fn with_runtime(mut self, handle: BackgroundHandle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// Downloads started through this host, newest last.
    pub fn downloads(&self) -> Vec<Value> {
        self.downloads.lock().map(|d| d.clone()).unwrap_or_default()
    }

    fn object_arg(args: &[Value]) -> Option<&Map<String, Value>> {
        args.first().and_then(Value::as_object)
    }

    fn storage_get(&self, args: &[Value]) -> Result<Value> {
        let stored = self.store.load()?;
        match args.first() {
            Some(Value::Object(defaults)) => {
                let mut out = defaults.clone();
                for key in defaults.keys() {
                    if let Some(v) = stored.get(key) {
                        out.insert(key.clone(), v.clone());
                    }
                }
                Ok(Value::Object(out))
            }
            _ => Ok(Value::Object(stored)),
        }
    }

    fn storage_set(&self, args: &[Value]) -> Result<Value> {
        let items = Self::object_arg(args).context("storage.set expects an object")?;
        let mut stored = self.store.load_for_update()?;
        for (k, v) in items {
            stored.insert(k.clone(), v.clone());
        }
        self.store.save(&stored)?;
        Ok(Value::Null)
    }

    fn storage_remove(&self, args: &[Value]) -> Result<Value> {
        let mut stored = self.store.load_for_update()?;
        match args.first() {
            Some(Value::Array(keys)) => {
                for key in keys.iter().filter_map(Value::as_str) {
                    stored.remove(key);
                }
            }
            Some(Value::String(key)) => {
                stored.remove(key);
            }
            _ => bail!("storage.remove expects a key or a list of keys"),
        }
        self.store.save(&stored)?;
        Ok(Value::Null)
    }

    fn start_download(&self, args: &[Value]) -> Result<Value> {
        let options: DownloadOptions = serde_json::from_value(args.first().cloned().unwrap_or_default())
            .context("downloads.download options")?;
        let mut downloads = self
            .downloads
            .lock()
            .map_err(|_| anyhow::anyhow!("download list poisoned"))?;
        let id = downloads.len() as i64 + 1;
        tracing::info!(download_id = id, "download queued: {}", options.url);
        downloads.push(json!({
            "id": id,
            "url": options.url,
            "filename": options.filename,
            "conflictAction": options.conflict_action,
            "state": "in_progress",
        }));
        Ok(json!(id))
    }

    fn cancel_download(&self, args: &[Value]) -> Result<Value> {
        let id = args
            .first()
            .and_then(Value::as_i64)
            .context("downloads.cancel expects an id")?;
        let mut downloads = self
            .downloads
            .lock()
            .map_err(|_| anyhow::anyhow!("download list poisoned"))?;
        // unknown ids are not an error, the browser behaves the same way
        if let Some(d) = downloads.iter_mut().find(|d| d["id"] == json!(id)) {
            d["state"] = json!("interrupted");
        }
        Ok(Value::Null)
    }

    fn search_downloads(&self, args: &[Value]) -> Result<Value> {
        let downloads = self.downloads();
        let Some(query) = Self::object_arg(args) else {
            return Ok(Value::Array(downloads));
        };
        let hits = downloads
            .into_iter()
            .filter(|d| query.iter().all(|(k, v)| d.get(k) == Some(v)))
            .collect();
        Ok(Value::Array(hits))
    }
}

#[async_trait]
impl PromiseApi for LocalHost {
    fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::RuntimeSendMessage => self.runtime.is_some(),
            Capability::StorageGet(area)
            | Capability::StorageSet(area)
            | Capability::StorageRemove(area)
            | Capability::StorageClear(area)
            | Capability::StorageBytesInUse(area) => area == StorageArea::Local,
            Capability::DownloadsDownload
            | Capability::DownloadsCancel
            | Capability::DownloadsSearch => true,
            Capability::TabsQuery | Capability::TabsSendMessage => false,
        }
    }

    async fn call(&self, capability: Capability, args: Vec<Value>) -> Result<Value, String> {
        let result = match capability {
            Capability::RuntimeSendMessage => match &self.runtime {
                Some(handle) => {
                    let message = args.into_iter().next().unwrap_or_default();
                    return Ok(handle.send_message(message).await);
                }
                None => Err(anyhow::anyhow!("no background attached")),
            },
            Capability::StorageGet(_) => self.storage_get(&args),
            Capability::StorageSet(_) => self.storage_set(&args),
            Capability::StorageRemove(_) => self.storage_remove(&args),
            Capability::StorageClear(_) => self.store.save(&Map::new()).map(|_| Value::Null),
            Capability::StorageBytesInUse(_) => self.store.bytes_in_use().map(|n| json!(n)),
            Capability::DownloadsDownload => self.start_download(&args),
            Capability::DownloadsCancel => self.cancel_download(&args),
            Capability::DownloadsSearch => self.search_downloads(&args),
            Capability::TabsQuery | Capability::TabsSendMessage => {
                Err(anyhow::anyhow!("{capability} is not available"))
            }
        };
        result.map_err(|e| format!("{e:#}"))
    }
}
