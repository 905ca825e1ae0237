//! Controller - composes proxy loading, partitioning, the worker pool and
//! the stats aggregator into one linear, non-reentrant run:
//! load proxies, start workers (blocking on the startup barrier), start the
//! aggregator, join.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use yantra_common::{
    ProxyEntry, ScanConfig, ScanSession, WorkerDescriptor, WorkerEntry, YantraError,
};

use crate::partition::{slice_of, slice_of_range};
use crate::pool::WorkerPool;
use crate::proxy::load_proxies;
use crate::stats::StatsAggregator;

pub struct Controller {
    session: ScanSession,
    proxies: Vec<ProxyEntry>,
    pool: Option<WorkerPool>,
    stats: Option<JoinHandle<()>>,
}

impl Controller {
    /// Create a controller and load its proxy pool.
    ///
    /// Malformed proxy lines are warned about and skipped inside the loader;
    /// only a missing/unreadable proxy file is an error here. No proxy file
    /// at all means the workers will connect directly.
    pub fn new(config: ScanConfig) -> Result<Self> {
        if config.workers == 0 {
            return Err(YantraError::Config("worker count must be at least 1".into()).into());
        }

        let proxies = match &config.proxy_file {
            Some(path) => {
                let loaded = load_proxies(path)?;
                info!(
                    "Loaded {} proxies ({} lines skipped)",
                    loaded.len(),
                    loaded.skipped
                );
                loaded.entries
            }
            None => {
                info!("No proxy file configured; workers connect directly");
                Vec::new()
            }
        };

        let session = ScanSession::new(config);
        Ok(Self {
            session,
            proxies,
            pool: None,
            stats: None,
        })
    }

    #[must_use]
    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    #[must_use]
    pub fn proxies(&self) -> &[ProxyEntry] {
        &self.proxies
    }

    /// Build the per-worker descriptors: each worker gets its disjoint slice
    /// of the proxy pool and of every configured range, plus the read-only
    /// scan settings.
    #[must_use]
    pub fn descriptors(&self) -> Vec<WorkerDescriptor> {
        let cfg = &self.session.config;
        (0..cfg.workers)
            .map(|index| WorkerDescriptor {
                index,
                proxies: slice_of(&self.proxies, index, cfg.workers),
                ranges: cfg
                    .ranges
                    .iter()
                    .map(|r| slice_of_range(r, index, cfg.workers))
                    .collect(),
                threads: cfg.threads,
                cutoff: cfg.cutoff,
                chunk_size: cfg.chunk_size,
                check_funds: cfg.check_funds,
                webhook_url: cfg.webhook_url.clone(),
                timeout: cfg.timeout,
            })
            .collect()
    }

    /// Launch the pool and the aggregator.
    ///
    /// Returns once the startup barrier has released, i.e. every worker has
    /// finished initializing and the scan is underway. A worker that dies
    /// before reaching the barrier makes this await forever - that liveness
    /// gap is inherited from the design, not handled.
    #[instrument(skip(self, entry), fields(session = %self.session.id))]
    pub async fn start(&mut self, entry: Arc<dyn WorkerEntry>) -> Result<()> {
        if self.pool.is_some() {
            return Err(YantraError::AlreadyStarted.into());
        }

        let descriptors = self.descriptors();
        info!(
            "Starting {} workers over {} identifiers ({} proxies)",
            descriptors.len(),
            self.session.config.total_ids(),
            self.proxies.len()
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let pool = WorkerPool::start(entry, descriptors, tx).await;
        info!("All workers ready; scan started");

        self.stats = Some(StatsAggregator::new().spawn(rx, pool.liveness()));
        self.pool = Some(pool);
        Ok(())
    }

    /// Block until every worker has exited, then reap the aggregator.
    pub async fn join(&mut self) -> Result<()> {
        let Some(pool) = self.pool.take() else {
            return Err(YantraError::NotStarted.into());
        };
        pool.join().await;

        // With all workers gone the aggregator stops on its own, either via
        // its liveness check or the closed channel.
        if let Some(stats) = self.stats.take() {
            if let Err(err) = stats.await {
                warn!("Stats aggregator terminated abnormally: {err}");
            }
        }
        info!(session = %self.session.id, "All workers exited");
        Ok(())
    }
}
