//! `xget classify <href>` – would a click on this link be intercepted.

use anyhow::Result;
use xget_core::content::{classify_link, DownloadSignal, LinkInfo};

pub fn run_classify(href: &str, text: Option<&str>, download_attr: bool) -> Result<()> {
    let link = LinkInfo::new(href)
        .with_text(text.unwrap_or_default())
        .with_download_attribute(download_attr);
    match classify_link(&link) {
        Some(signal) => println!("download ({})", describe(signal)),
        None => println!("not a download link"),
    }
    Ok(())
}

fn describe(signal: DownloadSignal) -> String {
    match signal {
        DownloadSignal::DownloadAttribute => "download attribute".to_string(),
        DownloadSignal::FileExtension(ext) => format!("file extension {ext}"),
        DownloadSignal::HostRule(rule) => format!("host rule {rule}"),
        DownloadSignal::LinkText(phrase) => format!("link text \"{phrase}\""),
    }
}
