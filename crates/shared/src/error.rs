//! Error types for the mirror updater

use thiserror::Error;

/// Error raised while downloading a mirror source page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to '{url}' failed: {reason}")]
    Network { url: String, reason: String },

    #[error("'{url}' answered with HTTP status {status}")]
    Status { url: String, status: u16 },
}

/// Error raised while updating the daemon configuration file
#[derive(Debug, Error)]
pub enum ConfigWriteError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize daemon configuration: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Error raised while reloading the container runtime service
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' exited with code {}", .code.map(|c| c.to_string()).unwrap_or_else(|| "none (killed by signal)".to_string()))]
    Exit { command: String, code: Option<i32> },
}

impl ReloadError {
    /// Exit code of the failing command, if it ran to completion
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ReloadError::Spawn { .. } => None,
            ReloadError::Exit { code, .. } => *code,
        }
    }
}

/// General updater error type
#[derive(Debug, Error)]
pub enum UpdaterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UpdaterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_error_messages() {
        let err = ReloadError::Exit {
            command: "systemctl daemon-reload".to_string(),
            code: Some(5),
        };
        assert_eq!(err.to_string(), "'systemctl daemon-reload' exited with code 5");
        assert_eq!(err.exit_code(), Some(5));

        let killed = ReloadError::Exit {
            command: "systemctl restart docker".to_string(),
            code: None,
        };
        assert!(killed.to_string().contains("killed by signal"));
    }

    #[test]
    fn test_umbrella_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: UpdaterError = io.into();
        assert_eq!(err.to_string(), "IO error: missing");
    }
}
