//! # Mirror Updater CLI
//!
//! Argument handling, logging setup and commands for `docker-mirror-updater`.

pub mod commands;
pub mod logging;
