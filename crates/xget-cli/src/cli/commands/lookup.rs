//! `xget lookup <url>` – which platform a URL belongs to.

use anyhow::{bail, Result};
use xget_core::platform;

pub fn run_lookup(url: &str) -> Result<()> {
    match platform::lookup(url) {
        Some(p) => {
            println!("{}\t{}", p.key, p.display_name);
            Ok(())
        }
        None => bail!("no supported platform matches {url}"),
    }
}
