//! CLI for Xget Now.

mod commands;
mod session;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use xget_core::config::{self, XgetConfig};

use commands::{
    run_classify, run_completions, run_download, run_lookup, run_man, run_platforms,
    run_settings, run_transform,
};
use session::Session;

/// Top-level CLI for the Xget Now URL accelerator.
#[derive(Debug, Parser)]
#[command(name = "xget")]
#[command(about = "Xget Now: route downloads from supported platforms through a mirror", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List supported platforms.
    Platforms,

    /// Show which platform a URL belongs to.
    Lookup {
        url: String,
    },

    /// Rewrite a URL through the mirror using the stored settings.
    Transform {
        url: String,
        /// Use this mirror domain instead of the stored one.
        #[arg(long, value_name = "DOMAIN")]
        domain: Option<String>,
    },

    /// Check whether a link would be intercepted as a download.
    Classify {
        href: String,
        /// Visible link text.
        #[arg(long, value_name = "TEXT")]
        text: Option<String>,
        /// The anchor carries a `download` attribute.
        #[arg(long)]
        download_attr: bool,
    },

    /// Show or change settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Feed a download-start event through the background coordinator.
    Download {
        url: String,
        /// Suggested filename of the original download.
        #[arg(long)]
        filename: Option<String>,
        /// Download id reported by the host.
        #[arg(long, default_value = "1", value_name = "N")]
        id: i64,
        /// Tab that started the download.
        #[arg(long, value_name = "N")]
        tab: Option<i64>,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the man page.
    Man,
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print the current settings.
    Show,
    /// Set the mirror domain (empty disables the extension).
    SetDomain { domain: String },
    Enable,
    Disable,
    /// Turn one platform on or off.
    Platform { key: String, state: Switch },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl Switch {
    pub fn is_on(self) -> bool {
        self == Switch::On
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Platforms => run_platforms()?,
            CliCommand::Lookup { url } => run_lookup(&url)?,
            CliCommand::Classify {
                href,
                text,
                download_attr,
            } => run_classify(&href, text.as_deref(), download_attr)?,
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
            CliCommand::Transform { url, domain } => {
                let (_, session) = open_session().await?;
                run_transform(&session, &url, domain.as_deref()).await?;
            }
            CliCommand::Settings { action } => {
                let (cfg, session) = open_session().await?;
                run_settings(&session, &cfg, action).await?;
            }
            CliCommand::Download {
                url,
                filename,
                id,
                tab,
            } => {
                let (_, session) = open_session().await?;
                run_download(&session, url, filename, id, tab).await?;
            }
        }

        Ok(())
    }
}

/// Config plus a running background coordinator over the storage file.
async fn open_session() -> Result<(XgetConfig, Session)> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    let session = Session::start(&cfg).await?;
    Ok((cfg, session))
}

#[cfg(test)]
mod tests;
