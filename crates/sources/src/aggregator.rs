//! Union of per-source mirror sets with fallback substitution

use shared::{MirrorEndpoint, MirrorSet};

/// Result of merging every source's mirrors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub mirrors: Vec<MirrorEndpoint>,
    /// True when no source produced anything and `mirrors` is the fallback list
    pub used_fallback: bool,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.mirrors.is_empty()
    }
}

/// Merge per-source results
///
/// A non-empty union is returned in URL order. An empty union is replaced by
/// `fallback` (deduplicated, configured order kept); the two are never mixed.
pub fn aggregate<I>(results: I, fallback: &[MirrorEndpoint]) -> Aggregation
where
    I: IntoIterator<Item = MirrorSet>,
{
    let union: MirrorSet = results.into_iter().flatten().collect();

    if !union.is_empty() {
        return Aggregation {
            mirrors: union.into_iter().collect(),
            used_fallback: false,
        };
    }

    let mut seen = MirrorSet::new();
    let mirrors = fallback
        .iter()
        .filter(|m| seen.insert((*m).clone()))
        .cloned()
        .collect();

    Aggregation {
        mirrors,
        used_fallback: true,
    }
}
