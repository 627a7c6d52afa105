//! # Mirror Updater Shared
//!
//! Common types, configuration and errors used across the updater crates.

pub mod error;
pub mod mirror;
pub mod config;

// Re-exports
pub use error::*;
pub use mirror::*;
pub use config::*;
