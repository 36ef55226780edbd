//! `xget platforms` – list supported platforms.

use anyhow::Result;
use xget_core::platform;

pub fn run_platforms() -> Result<()> {
    println!("{:<16} {:<18} {:<17} {}", "KEY", "NAME", "CATEGORY", "BASE URL");
    for p in platform::all() {
        println!(
            "{:<16} {:<18} {:<17} {}",
            p.key,
            p.display_name,
            p.category.label(),
            p.base_url
        );
    }
    Ok(())
}
