//! Mirror extraction strategies, dispatched on the source host

use shared::{MirrorSet, MirrorSource};
use tracing::{debug, warn};

/// Parses mirror URLs out of a source page
pub trait MirrorExtractor: Send + Sync {
    /// Strategy name used in log lines
    fn name(&self) -> &str;

    fn extract(&self, text: &str) -> MirrorSet;
}

/// Strategy for blog.csdn.net articles
///
/// Not implemented: the article markup has not been mapped yet, so this
/// always yields an empty set and discovery falls back to the static list.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsdnExtractor;

impl MirrorExtractor for CsdnExtractor {
    fn name(&self) -> &str {
        "csdn"
    }

    fn extract(&self, _text: &str) -> MirrorSet {
        debug!("csdn extraction is not implemented, returning no mirrors");
        MirrorSet::new()
    }
}

/// Strategy for cloud.tencent.com developer articles
///
/// Not implemented, same as [`CsdnExtractor`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TencentCloudExtractor;

impl MirrorExtractor for TencentCloudExtractor {
    fn name(&self) -> &str {
        "cloud.tencent"
    }

    fn extract(&self, _text: &str) -> MirrorSet {
        debug!("cloud.tencent extraction is not implemented, returning no mirrors");
        MirrorSet::new()
    }
}

/// Host-keyed set of extraction strategies
///
/// A strategy matches when its host fragment occurs in the source host.
/// The first registered match wins.
#[derive(Default)]
pub struct ExtractorRegistry {
    rules: Vec<(String, Box<dyn MirrorExtractor>)>,
}

impl ExtractorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the strategies for the built-in sources
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("csdn", CsdnExtractor);
        registry.register("cloud.tencent", TencentCloudExtractor);
        registry
    }

    /// Register a strategy for hosts containing `host_fragment`
    pub fn register(&mut self, host_fragment: impl Into<String>, extractor: impl MirrorExtractor + 'static) {
        self.rules.push((host_fragment.into(), Box::new(extractor)));
    }

    /// Find the strategy responsible for a source
    pub fn strategy_for(&self, source: &MirrorSource) -> Option<&dyn MirrorExtractor> {
        let url = reqwest::Url::parse(source.as_str()).ok()?;
        let host = url.host_str()?;

        self.rules
            .iter()
            .find(|(fragment, _)| host.contains(fragment.as_str()))
            .map(|(_, extractor)| extractor.as_ref())
    }

    /// Extract mirrors from a fetched page; unsupported sources yield nothing
    pub fn extract(&self, source: &MirrorSource, text: &str) -> MirrorSet {
        match self.strategy_for(source) {
            Some(extractor) => {
                let mirrors = extractor.extract(text);
                debug!("{} extractor found {} mirrors in {}", extractor.name(), mirrors.len(), source);
                mirrors
            }
            None => {
                warn!("Unsupported source: {}", source);
                MirrorSet::new()
            }
        }
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|(fragment, extractor)| (fragment, extractor.name())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::MirrorEndpoint;

    struct LineExtractor;

    impl MirrorExtractor for LineExtractor {
        fn name(&self) -> &str {
            "lines"
        }

        fn extract(&self, text: &str) -> MirrorSet {
            text.lines()
                .map(str::trim)
                .filter(|l| l.starts_with("https://"))
                .map(MirrorEndpoint::from)
                .collect()
        }
    }

    #[test]
    fn test_default_dispatch() {
        let registry = ExtractorRegistry::with_defaults();

        let csdn = MirrorSource::from("https://blog.csdn.net/c12312303/article/details/146428465");
        assert_eq!(registry.strategy_for(&csdn).map(|e| e.name()), Some("csdn"));

        let tencent = MirrorSource::from("https://cloud.tencent.com/developer/article/2485043");
        assert_eq!(registry.strategy_for(&tencent).map(|e| e.name()), Some("cloud.tencent"));
    }

    #[test]
    fn test_builtin_strategies_are_empty() {
        let registry = ExtractorRegistry::with_defaults();
        let page = "https://docker.m.daocloud.io\nhttps://hub-mirror.c.163.com";

        for source in shared::DEFAULT_SOURCES {
            assert!(registry.extract(&MirrorSource::from(*source), page).is_empty());
        }
    }

    #[test]
    fn test_unknown_host_yields_nothing() {
        let registry = ExtractorRegistry::with_defaults();
        let source = MirrorSource::from("https://example.com/mirrors");

        assert!(registry.strategy_for(&source).is_none());
        assert!(registry.extract(&source, "https://docker.1ms.run").is_empty());
    }

    #[test]
    fn test_unparseable_source_yields_nothing() {
        let registry = ExtractorRegistry::with_defaults();
        assert!(registry.extract(&MirrorSource::from("csdn"), "").is_empty());
    }

    #[test]
    fn test_custom_strategy() {
        let mut registry = ExtractorRegistry::new();
        registry.register("mirrors.example.org", LineExtractor);

        let source = MirrorSource::from("https://mirrors.example.org/list.txt");
        let mirrors = registry.extract(&source, "https://b.example\n  https://a.example\nnot a mirror\nhttps://a.example");

        let expected: Vec<&str> = vec!["https://a.example", "https://b.example"];
        assert_eq!(mirrors.iter().map(MirrorEndpoint::as_str).collect::<Vec<_>>(), expected);
    }
}
