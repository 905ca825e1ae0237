// runner.rs
use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use yantra_common::{IdRange, ScanConfig, WorkerContext, WorkerEntry};
use yantra_controller::Controller;

/// Batch pacing for the dry-run entry, so CPM output is observable instead of
/// a single burst.
const DRY_RUN_PACE: Duration = Duration::from_millis(25);

/// Built-in worker entry that walks its assigned ranges chunk by chunk and
/// reports completions without issuing any network requests. It exercises the
/// whole controller path - partitioning, barrier, completion channel - and
/// doubles as a template for real scanning entries.
pub struct DryRunWorker {
    pace: Duration,
}

impl Default for DryRunWorker {
    fn default() -> Self {
        Self {
            pace: DRY_RUN_PACE,
        }
    }
}

#[async_trait]
impl WorkerEntry for DryRunWorker {
    async fn run(&self, ctx: WorkerContext) {
        // Nothing else to initialize for a dry run; arrive straight away.
        ctx.ready().await;

        let d = &ctx.descriptor;
        let chunk = d.chunk_size.max(1);
        for range in &d.ranges {
            let mut cursor = range.start.max(d.cutoff).min(range.end);
            while cursor < range.end {
                let batch = chunk.min(range.end - cursor);
                tokio::time::sleep(self.pace).await;
                cursor += batch;
                ctx.report(batch);
            }
        }
        debug!(worker = d.index, "Dry run complete");
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn run_scan(
    ranges: Vec<String>,
    workers: usize,
    threads: usize,
    cutoff: u64,
    chunk_size: u64,
    check_funds: bool,
    webhook_url: Option<String>,
    timeout: u64,
    proxy_file: Option<PathBuf>,
) -> Result<()> {
    let ranges = ranges
        .iter()
        .map(|s| s.parse::<IdRange>())
        .collect::<Result<Vec<_>, _>>()?;

    info!("Starting scan...");
    info!("Workers: {}", workers);
    info!("Threads per worker: {}", threads);
    for r in &ranges {
        info!("Range: {} ({} identifiers)", r, r.len());
    }
    if let Some(path) = &proxy_file {
        info!("Proxy file: {}", path.display());
    }

    let config = ScanConfig {
        workers,
        threads,
        ranges,
        cutoff,
        chunk_size,
        check_funds,
        webhook_url,
        timeout: Duration::from_millis(timeout),
        proxy_file,
    };

    let mut controller = Controller::new(config)?;
    let entry = Arc::new(DryRunWorker::default());

    let scan_start = Instant::now();
    controller.start(entry).await?;
    controller.join().await?;
    info!("Scan finished in {:.1}s", scan_start.elapsed().as_secs_f64());
    Ok(())
}
