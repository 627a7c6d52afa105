//! CLI Commands

pub mod update;
pub mod resolve;

pub use update::UpdateCommand;
pub use resolve::ResolveCommand;

use clap::Args;
use shared::{MirrorEndpoint, MirrorSource, UpdaterConfig};
use std::future::Future;
use std::path::PathBuf;
use tracing::error;
use updater::{HttpFetcher, MirrorUpdater, SystemCommandRunner};

/// Settings shared by every command; flags override the config file
#[derive(Debug, Default, Args)]
pub struct ConfigArgs {
    /// Updater configuration file (JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Container runtime daemon configuration to update
    #[arg(long, global = true, value_name = "PATH")]
    pub daemon_config: Option<PathBuf>,

    /// Page to scrape for mirrors (repeatable, replaces the defaults)
    #[arg(long = "source", global = true, value_name = "URL")]
    pub sources: Vec<String>,

    /// Mirror used when scraping finds nothing (repeatable, replaces the defaults)
    #[arg(long = "fallback", global = true, value_name = "URL")]
    pub fallback_mirrors: Vec<String>,

    /// Log file appended to alongside stdout
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log to stdout only
    #[arg(long, global = true, conflicts_with = "log_file")]
    pub no_log_file: bool,

    /// Service restarted after the update
    #[arg(long, global = true)]
    pub service: Option<String>,

    /// Per-source fetch timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub fetch_timeout: Option<u64>,
}

impl ConfigArgs {
    /// Load the config file, if any, and apply flag overrides
    pub fn resolve(&self) -> shared::Result<UpdaterConfig> {
        let mut config = match &self.config {
            Some(path) => UpdaterConfig::from_file(path)?,
            None => UpdaterConfig::default(),
        };

        if let Some(path) = &self.daemon_config {
            config.daemon_config_path = path.clone();
        }
        if !self.sources.is_empty() {
            config.sources = self.sources.iter().map(|s| MirrorSource::new(s.as_str())).collect();
        }
        if !self.fallback_mirrors.is_empty() {
            config.fallback_mirrors = self.fallback_mirrors.iter().map(|m| MirrorEndpoint::new(m.as_str())).collect();
        }
        if self.no_log_file {
            config.log_file = None;
        } else if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
        if let Some(service) = &self.service {
            config.service = service.clone();
        }
        if let Some(secs) = self.fetch_timeout {
            config.fetch_timeout_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Updater wired to the network and the host service manager
pub fn system_updater(config: UpdaterConfig) -> anyhow::Result<MirrorUpdater<HttpFetcher, SystemCommandRunner>> {
    let fetcher = HttpFetcher::new(config.fetch_timeout())?;
    Ok(MirrorUpdater::new(config, fetcher, SystemCommandRunner))
}

/// Run a command to completion and map its result to a process exit code
///
/// Errors and panics escaping the command are logged and exit 1.
pub async fn exit_code<F>(command: F) -> u8
where
    F: Future<Output = anyhow::Result<u8>> + Send + 'static,
{
    match tokio::spawn(command).await {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            error!("Mirror update aborted: {:#}", e);
            1
        }
        Err(e) => {
            error!("Mirror update panicked: {}", e);
            1
        }
    }
}
