//! ServiceReloader - Restart the container runtime after a configuration change

use async_trait::async_trait;
use shared::ReloadError;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// External command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ServiceCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for ServiceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Exit status of a finished command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl CommandStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands, inheriting stdio
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn status(&self, command: &ServiceCommand) -> std::io::Result<CommandStatus>;
}

#[async_trait]
impl<T: CommandRunner + ?Sized> CommandRunner for Arc<T> {
    async fn status(&self, command: &ServiceCommand) -> std::io::Result<CommandStatus> {
        (**self).status(command).await
    }
}

/// `CommandRunner` spawning real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn status(&self, command: &ServiceCommand) -> std::io::Result<CommandStatus> {
        let status = tokio::process::Command::new(&command.program)
            .args(&command.args)
            .status()
            .await?;
        Ok(CommandStatus { code: status.code() })
    }
}

/// Service reloader
///
/// Runs the reload command, then the restart command. The sequence stops at
/// the first command that fails.
#[derive(Debug)]
pub struct ServiceReloader<R> {
    runner: R,
    reload: ServiceCommand,
    restart: ServiceCommand,
}

impl<R: CommandRunner> ServiceReloader<R> {
    pub fn new(runner: R, reload: ServiceCommand, restart: ServiceCommand) -> Self {
        Self { runner, reload, restart }
    }

    /// `<manager> daemon-reload` followed by `<manager> restart <service>`
    pub fn systemd(runner: R, service_manager: &str, service: &str) -> Self {
        Self::new(
            runner,
            ServiceCommand::new(service_manager, ["daemon-reload"]),
            ServiceCommand::new(service_manager, ["restart", service]),
        )
    }

    pub fn commands(&self) -> [&ServiceCommand; 2] {
        [&self.reload, &self.restart]
    }

    pub async fn reload(&self) -> Result<(), ReloadError> {
        info!("Restarting service with '{}'", self.restart);

        for command in self.commands() {
            self.run(command).await?;
        }

        info!("Service restarted");
        Ok(())
    }

    async fn run(&self, command: &ServiceCommand) -> Result<(), ReloadError> {
        let status = self.runner.status(command).await.map_err(|e| {
            error!("Failed to run '{}': {}", command, e);
            ReloadError::Spawn {
                command: command.to_string(),
                source: e,
            }
        })?;

        if !status.success() {
            error!("'{}' failed with exit code {:?}", command, status.code);
            return Err(ReloadError::Exit {
                command: command.to_string(),
                code: status.code,
            });
        }

        Ok(())
    }
}
