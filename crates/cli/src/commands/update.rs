//! docker-mirror-updater update command

use clap::Args;
use shared::UpdaterConfig;

#[derive(Debug, Default, Args)]
pub struct UpdateCommand {
    /// Write the daemon configuration but do not reload the service
    #[arg(long)]
    pub skip_reload: bool,
}

impl UpdateCommand {
    /// Run the full update, returning the process exit code
    pub async fn run(&self, config: UpdaterConfig) -> anyhow::Result<u8> {
        let updater = super::system_updater(config)?.skip_reload(self.skip_reload);
        let outcome = updater.run().await;
        Ok(outcome.exit_code())
    }
}
