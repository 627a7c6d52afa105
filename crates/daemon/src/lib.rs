//! # Mirror Updater Daemon
//!
//! Applies a mirror list to the container runtime.
//!
//! ## Components
//!
//! - `DaemonConfigWriter` - Merge `registry-mirrors` into the daemon configuration file
//! - `ServiceReloader` - Reload unit definitions and restart the runtime service

pub mod config_writer;
pub mod service_reloader;

pub use config_writer::{DaemonConfigWriter, PriorConfig, WriteReport};
pub use service_reloader::{CommandRunner, CommandStatus, ServiceCommand, ServiceReloader, SystemCommandRunner};
