//! # Mirror Updater
//!
//! Orchestration of the update run: fetch sources, aggregate mirrors, write
//! the daemon configuration and reload the service.

mod mirror_updater;

pub use mirror_updater::{Discovery, MirrorUpdater, RunOutcome, SourceReport, Stage};

// Re-export dependencies
pub use sources::{ExtractorRegistry, HttpFetcher, MirrorExtractor, PageFetcher};
pub use daemon::{CommandRunner, DaemonConfigWriter, ServiceReloader, SystemCommandRunner};
