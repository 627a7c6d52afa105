//! Mirror value types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Key holding the mirror list inside the daemon configuration
pub const REGISTRY_MIRRORS_KEY: &str = "registry-mirrors";

/// URL of a page that lists registry mirrors
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MirrorSource(String);

impl MirrorSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MirrorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MirrorSource {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

/// URL of a registry mirror endpoint
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MirrorEndpoint(String);

impl MirrorEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MirrorEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MirrorEndpoint {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

/// Deduplicated set of mirrors, iterated in URL order
pub type MirrorSet = BTreeSet<MirrorEndpoint>;

/// Render the first `limit` mirrors for log lines, with an ellipsis when truncated
pub fn preview(mirrors: &[MirrorEndpoint], limit: usize) -> String {
    let shown: Vec<&str> = mirrors.iter().take(limit).map(MirrorEndpoint::as_str).collect();
    let mut out = shown.join(", ");
    if mirrors.len() > limit {
        out.push_str(", ...");
    }
    out
}
