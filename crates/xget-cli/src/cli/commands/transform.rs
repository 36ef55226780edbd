//! `xget transform <url>` – rewrite a URL with the stored settings.

use anyhow::{bail, Result};
use xget_core::transform::transform_url;

use crate::cli::session::Session;

/// Prints and returns the rewritten URL.
pub async fn run_transform(session: &Session, url: &str, domain: Option<&str>) -> Result<String> {
    let settings = session.coordinator.load_settings().await;
    let domain = domain.unwrap_or(&settings.mirror_domain);
    if domain.is_empty() {
        bail!("no mirror domain configured (try `xget settings set-domain <domain>`)");
    }
    match transform_url(url, domain, &settings.enabled_platforms) {
        Some(rewritten) => {
            println!("{rewritten}");
            Ok(rewritten)
        }
        None => bail!("{url} is not on an enabled platform"),
    }
}
