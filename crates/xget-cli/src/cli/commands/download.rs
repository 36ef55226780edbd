//! `xget download <url>` – run a download-start event through the coordinator.

use anyhow::{Context, Result};
use xget_core::background::{DownloadItem, DownloadOutcome, Suggest};

use crate::cli::session::Session;

pub async fn run_download(
    session: &Session,
    url: String,
    filename: Option<String>,
    id: i64,
    tab: Option<i64>,
) -> Result<DownloadOutcome> {
    let item = DownloadItem {
        id,
        url,
        filename,
        tab_id: tab,
    };
    let suggest = Suggest::new(move || tracing::debug!(download_id = id, "filename suggestion acknowledged"));
    let outcome = session
        .handle
        .download_started(item, suggest)
        .await
        .context("background loop stopped before deciding")?;

    match &outcome {
        DownloadOutcome::NotApplicable => println!("extension disabled or no mirror configured"),
        DownloadOutcome::NoMatch => println!("no enabled platform matches; download left alone"),
        DownloadOutcome::Redirected {
            url,
            cancelled,
            relaunched,
        } => {
            println!("redirected to {url}");
            println!("  original cancelled: {}", yes_no(*cancelled));
            println!("  mirror download started: {}", yes_no(*relaunched));
        }
    }
    Ok(outcome)
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}
