//! docker-mirror-updater resolve command

use clap::Args;
use shared::UpdaterConfig;

#[derive(Debug, Default, Args)]
pub struct ResolveCommand {
    /// Print the mirrors as a JSON array
    #[arg(long)]
    pub json: bool,
}

impl ResolveCommand {
    /// Discover mirrors and print them without touching the daemon
    pub async fn run(&self, config: UpdaterConfig) -> anyhow::Result<u8> {
        let updater = super::system_updater(config)?;
        let discovery = updater.discover().await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&discovery.mirrors)?);
        } else {
            for mirror in &discovery.mirrors {
                println!("{}", mirror);
            }
        }

        Ok(if discovery.mirrors.is_empty() { 1 } else { 0 })
    }
}
