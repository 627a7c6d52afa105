//! MirrorUpdater - Sequences discovery, configuration write and service reload

use daemon::{CommandRunner, DaemonConfigWriter, PriorConfig, ServiceReloader, WriteReport};
use shared::{preview, ConfigWriteError, FetchError, MirrorEndpoint, MirrorSet, MirrorSource, ReloadError, UpdaterConfig};
use sources::{aggregate, ExtractorRegistry, PageFetcher};
use tracing::{debug, error, info, warn};

/// Mirrors shown in the summary log line
const PREVIEW_LIMIT: usize = 3;

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Aggregating,
    Writing,
    Reloading,
    Done,
    Failed,
}

/// What one source contributed
#[derive(Debug)]
pub struct SourceReport {
    pub source: MirrorSource,
    pub result: Result<MirrorSet, FetchError>,
}

/// Outcome of the fetch and aggregate stages
#[derive(Debug)]
pub struct Discovery {
    pub reports: Vec<SourceReport>,
    pub mirrors: Vec<MirrorEndpoint>,
    pub used_fallback: bool,
}

/// Outcome of a full run
#[derive(Debug)]
pub struct RunOutcome {
    /// `Done` or `Failed`
    pub stage: Stage,
    pub mirrors: Vec<MirrorEndpoint>,
    pub used_fallback: bool,
    /// `None` when the write was never attempted
    pub write: Option<Result<WriteReport, ConfigWriteError>>,
    /// `None` when the reload was skipped
    pub reload: Option<Result<(), ReloadError>>,
}

impl RunOutcome {
    /// Process exit status
    ///
    /// Only an empty mirror list fails the run. Write and reload failures are
    /// reported in the log but still exit 0.
    pub fn exit_code(&self) -> u8 {
        match self.stage {
            Stage::Failed => 1,
            _ => 0,
        }
    }

    pub fn written(&self) -> bool {
        matches!(self.write, Some(Ok(_)))
    }

    pub fn reloaded(&self) -> bool {
        matches!(self.reload, Some(Ok(())))
    }
}

/// Mirror updater
pub struct MirrorUpdater<F, R> {
    config: UpdaterConfig,
    fetcher: F,
    extractors: ExtractorRegistry,
    writer: DaemonConfigWriter,
    reloader: ServiceReloader<R>,
    skip_reload: bool,
}

impl<F: PageFetcher, R: CommandRunner> MirrorUpdater<F, R> {
    /// Create an updater with the built-in extraction strategies
    pub fn new(config: UpdaterConfig, fetcher: F, runner: R) -> Self {
        let writer = DaemonConfigWriter::new(config.daemon_config_path.clone());
        let reloader = ServiceReloader::systemd(runner, &config.service_manager, &config.service);

        Self {
            config,
            fetcher,
            extractors: ExtractorRegistry::with_defaults(),
            writer,
            reloader,
            skip_reload: false,
        }
    }

    /// Replace the extraction strategies
    pub fn with_extractors(mut self, extractors: ExtractorRegistry) -> Self {
        self.extractors = extractors;
        self
    }

    /// Write the configuration without touching the service
    pub fn skip_reload(mut self, skip: bool) -> Self {
        self.skip_reload = skip;
        self
    }

    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    /// Fetch every source and aggregate the results
    pub async fn discover(&self) -> Discovery {
        debug!(stage = ?Stage::Fetching, "Entering stage");
        let mut reports = Vec::with_capacity(self.config.sources.len());

        for source in &self.config.sources {
            info!("Fetching mirror list from {}", source);
            let result = self
                .fetcher
                .fetch(source)
                .await
                .map(|page| self.extractors.extract(source, &page));

            if let Err(e) = &result {
                error!("Failed to fetch mirrors from {}: {}", source, e);
            }
            reports.push(SourceReport {
                source: source.clone(),
                result,
            });
        }

        debug!(stage = ?Stage::Aggregating, "Entering stage");
        let sets = reports.iter().filter_map(|r| r.result.as_ref().ok().cloned());
        let aggregation = aggregate(sets, &self.config.fallback_mirrors);

        if aggregation.used_fallback {
            warn!("No mirrors discovered from sources, using fallback mirrors");
        }

        Discovery {
            reports,
            mirrors: aggregation.mirrors,
            used_fallback: aggregation.used_fallback,
        }
    }

    /// Run the whole pipeline
    pub async fn run(&self) -> RunOutcome {
        info!("=== Docker mirror update started ===");

        let discovery = self.discover().await;
        let mut outcome = RunOutcome {
            stage: Stage::Aggregating,
            mirrors: discovery.mirrors,
            used_fallback: discovery.used_fallback,
            write: None,
            reload: None,
        };

        if outcome.mirrors.is_empty() {
            error!("No mirrors available, aborting");
            outcome.stage = Stage::Failed;
            return outcome;
        }

        info!(
            "Resolved {} mirrors: {}",
            outcome.mirrors.len(),
            preview(&outcome.mirrors, PREVIEW_LIMIT)
        );

        outcome.stage = Stage::Writing;
        debug!(stage = ?outcome.stage, "Entering stage");
        let write = self.writer.write_mirrors(&outcome.mirrors);
        match &write {
            Ok(report) if report.prior == PriorConfig::Corrupt => {
                warn!("Previous settings in {} were discarded", report.path.display());
            }
            Ok(_) => {}
            Err(e) => error!("Failed to update daemon configuration: {}", e),
        }
        let written = write.is_ok();
        outcome.write = Some(write);

        // TODO: report a failed write through the exit status once cron callers stop relying on exit 0.
        if written && !self.skip_reload {
            outcome.stage = Stage::Reloading;
            debug!(stage = ?outcome.stage, "Entering stage");
            outcome.reload = Some(self.reloader.reload().await);
        } else if written {
            info!("Skipping service reload");
        }

        outcome.stage = Stage::Done;
        info!("=== Docker mirror update finished ===");
        outcome
    }
}
