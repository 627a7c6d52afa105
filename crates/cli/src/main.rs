//! docker-mirror-updater - Refresh the container runtime's registry mirrors
//!
//! Usage:
//!   docker-mirror-updater                 - Discover mirrors, update daemon.json, restart docker
//!   docker-mirror-updater update          - Same as above
//!   docker-mirror-updater resolve [--json] - Print the mirrors that would be written

use clap::{Parser, Subcommand};
use cli::commands::{self, ConfigArgs, ResolveCommand, UpdateCommand};
use cli::logging::{self, Console};
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "docker-mirror-updater")]
#[command(about = "Refresh registry mirrors in the container runtime daemon configuration")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover mirrors, write them and restart the service
    Update(UpdateCommand),
    /// Discover mirrors and print them
    Resolve(ResolveCommand),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let console = match cli.command {
        Some(Commands::Resolve(_)) => Console::Stderr,
        _ => Console::Stdout,
    };

    let config = match cli.config.resolve() {
        Ok(config) => config,
        Err(e) => {
            logging::init(console, None);
            error!("Invalid configuration: {}", e);
            return ExitCode::from(1);
        }
    };

    logging::init(console, config.log_file.as_deref());

    let code = match cli.command {
        Some(Commands::Update(cmd)) => commands::exit_code(async move { cmd.run(config).await }).await,
        Some(Commands::Resolve(cmd)) => commands::exit_code(async move { cmd.run(config).await }).await,
        None => commands::exit_code(async move { UpdateCommand::default().run(config).await }).await,
    };

    ExitCode::from(code)
}
