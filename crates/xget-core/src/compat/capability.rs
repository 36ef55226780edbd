use serde_json::{json, Value};
use std::fmt;

/// Storage area offered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageArea {
    Local,
    Sync,
}

impl StorageArea {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageArea::Local => "local",
            StorageArea::Sync => "sync",
        }
    }
}

/// One host API method the shim knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    RuntimeSendMessage,
    StorageGet(StorageArea),
    StorageSet(StorageArea),
    StorageRemove(StorageArea),
    StorageClear(StorageArea),
    StorageBytesInUse(StorageArea),
    TabsQuery,
    TabsSendMessage,
    DownloadsDownload,
    DownloadsCancel,
    DownloadsSearch,
}

impl Capability {
    /// Placeholder handed back when the call is unavailable or failed.
    pub fn neutral_value(self) -> Value {
        match self {
            Capability::StorageGet(_) => json!({}),
            Capability::StorageBytesInUse(_) => json!(0),
            Capability::TabsQuery | Capability::DownloadsSearch => json!([]),
            _ => Value::Null,
        }
    }

    /// Storage calls are the ones whose rejection the caller can act on.
    pub fn is_actionable(self) -> bool {
        matches!(
            self,
            Capability::StorageGet(_)
                | Capability::StorageSet(_)
                | Capability::StorageRemove(_)
                | Capability::StorageClear(_)
        )
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::RuntimeSendMessage => write!(f, "runtime.sendMessage"),
            Capability::StorageGet(a) => write!(f, "storage.{}.get", a.as_str()),
            Capability::StorageSet(a) => write!(f, "storage.{}.set", a.as_str()),
            Capability::StorageRemove(a) => write!(f, "storage.{}.remove", a.as_str()),
            Capability::StorageClear(a) => write!(f, "storage.{}.clear", a.as_str()),
            Capability::StorageBytesInUse(a) => write!(f, "storage.{}.getBytesInUse", a.as_str()),
            Capability::TabsQuery => write!(f, "tabs.query"),
            Capability::TabsSendMessage => write!(f, "tabs.sendMessage"),
            Capability::DownloadsDownload => write!(f, "downloads.download"),
            Capability::DownloadsCancel => write!(f, "downloads.cancel"),
            Capability::DownloadsSearch => write!(f, "downloads.search"),
        }
    }
}
