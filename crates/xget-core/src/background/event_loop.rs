//! Event loop that feeds host events into the coordinator.
//!
//! The entry point creates the channel, hands the receiver to [`run`] once,
//! and gives clones of the [`BackgroundHandle`] to whatever produces events.
//! Owning the receiver is what registers the listeners, so there is nothing
//! to register twice.

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

use super::{Coordinator, DownloadItem, DownloadOutcome, Suggest};
use crate::settings::Settings;

pub type EventReceiver = mpsc::Receiver<BackgroundEvent>;

/// One host event addressed to the background side.
#[derive(Debug)]
pub enum BackgroundEvent {
    Installed {
        done: Option<oneshot::Sender<Settings>>,
    },
    DeterminingFilename {
        item: DownloadItem,
        suggest: Suggest,
        done: Option<oneshot::Sender<DownloadOutcome>>,
    },
    Message {
        message: Value,
        reply: oneshot::Sender<Value>,
    },
}

/// Sending side of the background channel.
#[derive(Debug, Clone)]
pub struct BackgroundHandle {
    tx: mpsc::Sender<BackgroundEvent>,
}

pub fn channel(capacity: usize) -> (BackgroundHandle, EventReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (BackgroundHandle { tx }, rx)
}

impl BackgroundHandle {
    async fn post(&self, event: BackgroundEvent) -> bool {
        if self.tx.send(event).await.is_err() {
            tracing::debug!("background loop is gone, event dropped");
            return false;
        }
        true
    }

    /// Deliver a runtime message and wait for the answer. `null` when the
    /// message was not handled or the loop has stopped.
    pub async fn send_message(&self, message: Value) -> Value {
        let (reply, rx) = oneshot::channel();
        if !self.post(BackgroundEvent::Message { message, reply }).await {
            return Value::Null;
        }
        rx.await.unwrap_or(Value::Null)
    }

    /// Deliver a download-start event and wait for the redirect decision.
    pub async fn download_started(
        &self,
        item: DownloadItem,
        suggest: Suggest,
    ) -> Option<DownloadOutcome> {
        let (done, rx) = oneshot::channel();
        let event = BackgroundEvent::DeterminingFilename {
            item,
            suggest,
            done: Some(done),
        };
        if !self.post(event).await {
            return None;
        }
        rx.await.ok()
    }

    /// Deliver the install/update event and wait for the initialized settings.
    pub async fn installed(&self) -> Option<Settings> {
        let (done, rx) = oneshot::channel();
        if !self.post(BackgroundEvent::Installed { done: Some(done) }).await {
            return None;
        }
        rx.await.ok()
    }
}

/// Drain events until every handle is dropped.
///
/// Install runs inline so later events see initialized settings; downloads
/// and messages run on their own tasks.
pub async fn run(coordinator: Arc<Coordinator>, mut rx: EventReceiver) {
    tracing::debug!("background loop started");
    while let Some(event) = rx.recv().await {
        match event {
            BackgroundEvent::Installed { done } => {
                let settings = coordinator.on_installed().await;
                if let Some(done) = done {
                    let _ = done.send(settings);
                }
            }
            BackgroundEvent::DeterminingFilename {
                item,
                suggest,
                done,
            } => {
                let task = coordinator.on_determining_filename(item, suggest);
                tokio::spawn(async move {
                    match task.await {
                        Ok(outcome) => {
                            if let Some(done) = done {
                                let _ = done.send(outcome);
                            }
                        }
                        Err(e) => tracing::warn!("download task failed: {e}"),
                    }
                });
            }
            BackgroundEvent::Message { message, reply } => {
                let coordinator = Arc::clone(&coordinator);
                tokio::spawn(async move {
                    let answer = coordinator
                        .handle_message(&message)
                        .await
                        .unwrap_or(Value::Null);
                    let _ = reply.send(answer);
                });
            }
        }
    }
    tracing::debug!("background loop stopped");
}
