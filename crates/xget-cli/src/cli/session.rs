//! One CLI invocation's view of the extension: a background coordinator over
//! the storage file, and a client API whose runtime channel reaches it.

use anyhow::Result;
use std::sync::Arc;
use xget_core::background::{self, BackgroundHandle, Coordinator};
use xget_core::compat::{PromiseApi, WebExt};
use xget_core::config::XgetConfig;
use xget_core::host::{FileStore, LocalHost};
use xget_core::settings::Settings;

pub struct Session {
    pub coordinator: Arc<Coordinator>,
    pub handle: BackgroundHandle,
    /// API as the popup or a content script sees it.
    pub client: WebExt,
}

impl Session {
    pub async fn start(cfg: &XgetConfig) -> Result<Self> {
        let path = cfg.resolved_storage_path()?;
        let first_run = !path.exists();
        let (handle, rx) = background::channel(16);
        let background_host: Arc<dyn PromiseApi> = Arc::new(LocalHost::new(FileStore::new(&path)));
        let api = detect_api(cfg, background_host)?;
        let coordinator = Arc::new(Coordinator::new(
            api,
            Settings::with_domain(&cfg.default_mirror_domain),
        ));
        tokio::spawn(background::run(Arc::clone(&coordinator), rx));

        if first_run {
            tracing::info!("initializing settings at {}", path.display());
            handle.installed().await;
        }

        let client_host: Arc<dyn PromiseApi> =
            Arc::new(LocalHost::new(FileStore::new(&path)).with_runtime(handle.clone()));
        let client = detect_api(cfg, client_host)?;

        Ok(Self {
            coordinator,
            handle,
            client,
        })
    }
}

/// The stand-alone host only speaks the promise style; detection still
/// classifies the configured browser for storage-area choice.
fn detect_api(cfg: &XgetConfig, host: Arc<dyn PromiseApi>) -> Result<WebExt> {
    let api = WebExt::detect(
        cfg.extension_url(),
        cfg.user_agent(),
        env!("CARGO_PKG_VERSION"),
        Some(host),
        None,
    )?;
    Ok(api)
}
