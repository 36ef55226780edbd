//! `xget settings ...` – the popup's controls from the command line.

use anyhow::{bail, Result};
use xget_core::config::XgetConfig;
use xget_core::popup::{SettingsPanel, Status, StatusKind, VISIBLE_PLATFORMS};

use crate::cli::session::Session;
use crate::cli::SettingsAction;

pub async fn run_settings(session: &Session, cfg: &XgetConfig, action: SettingsAction) -> Result<()> {
    let mut panel = SettingsPanel::load(session.client.clone(), cfg.settings_load_timeout()).await;
    if let Some(status) = panel.status() {
        eprintln!("{status}");
    }

    let status = match action {
        SettingsAction::Show => {
            print_form(&panel);
            return Ok(());
        }
        SettingsAction::SetDomain { domain } => {
            let status = panel.change_domain(&domain).await;
            if let Some(warning) = panel.blur_domain() {
                eprintln!("{warning}");
            }
            status
        }
        SettingsAction::Enable => panel.toggle_enabled(true).await,
        SettingsAction::Disable => panel.toggle_enabled(false).await,
        SettingsAction::Platform { key, state } => panel.toggle_platform(&key, state.is_on()).await?,
    };
    report(&status)
}

fn report(status: &Status) -> Result<()> {
    match status.kind {
        StatusKind::Error => bail!("{}", status.message),
        StatusKind::Warning => eprintln!("{status}"),
        StatusKind::Success => println!("{}", status.message),
    }
    Ok(())
}

fn print_form(panel: &SettingsPanel) {
    let form = panel.form();
    println!("enabled: {}", form.enabled());
    let domain = if form.domain().is_empty() {
        "(not set)"
    } else {
        form.domain()
    };
    println!("mirror domain: {domain}");
    println!("platforms:");
    for key in VISIBLE_PLATFORMS {
        let on = form.platform(key).unwrap_or(false);
        println!("  {:<10} {}", key, if on { "on" } else { "off" });
    }
}
