//! Worker pool and startup barrier.
//!
//! Each descriptor becomes one tokio task that owns it outright - the Rust
//! rendition of the original design's isolated worker processes. Startup is
//! all-or-nothing: a `workers + 1`-party barrier holds every worker at
//! `WorkerContext::ready()` until the pool itself arrives, so no worker gets
//! a head start on a rate-limited upstream while its siblings are still
//! parsing their proxy slices.
//!
//! Known liveness gap, inherited deliberately: a worker that dies before
//! reaching the barrier hangs `start()` and the whole cohort forever. There
//! is no timeout and no supervision.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Barrier;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use yantra_common::{CompletionSender, WorkerContext, WorkerDescriptor, WorkerEntry};

/// Shared count of workers still running; the stats aggregator's external
/// liveness query.
#[derive(Clone, Default)]
pub struct Liveness(Arc<AtomicUsize>);

impl Liveness {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn alive(&self) -> usize {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    #[must_use]
    pub fn any_alive(&self) -> bool {
        self.alive() > 0
    }

    /// Count one worker as alive until the returned guard drops. Tied to a
    /// guard rather than an explicit call so panicking workers still count
    /// down.
    pub(crate) fn register(&self) -> AliveGuard {
        self.0.fetch_add(1, Ordering::AcqRel);
        AliveGuard(Arc::clone(&self.0))
    }
}

pub(crate) struct AliveGuard(Arc<AtomicUsize>);

impl Drop for AliveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// A started cohort of workers.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    liveness: Liveness,
}

impl WorkerPool {
    /// Spawn one worker per descriptor, then arrive at the startup barrier.
    ///
    /// Returns only once every worker has reached `ready()` - i.e. when the
    /// barrier has released and the scan is actually underway.
    pub async fn start(
        entry: Arc<dyn WorkerEntry>,
        descriptors: Vec<WorkerDescriptor>,
        sink: CompletionSender,
    ) -> Self {
        let barrier = Arc::new(Barrier::new(descriptors.len() + 1));
        let liveness = Liveness::new();
        let mut handles = Vec::with_capacity(descriptors.len());

        for descriptor in descriptors {
            debug!(
                worker = descriptor.index,
                entry = entry.name(),
                proxies = descriptor.proxies.len(),
                "Spawning worker"
            );
            let guard = liveness.register();
            let ctx = WorkerContext::new(descriptor, Arc::clone(&barrier), sink.clone());
            let entry = Arc::clone(&entry);
            handles.push(tokio::spawn(async move {
                let _guard = guard;
                entry.run(ctx).await;
            }));
        }
        // Only workers may hold senders from here on; the channel then closes
        // by itself once the last worker exits.
        drop(sink);

        // The pool's own arrival is what releases the cohort.
        barrier.wait().await;

        Self { handles, liveness }
    }

    /// Handle for the aggregator's pre-read liveness check.
    #[must_use]
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker to exit, in launch order. Exit order itself is
    /// unconstrained; a worker that panicked is logged, not propagated.
    pub async fn join(self) {
        for (index, handle) in self.handles.into_iter().enumerate() {
            if let Err(err) = handle.await {
                warn!("Worker {index} terminated abnormally: {err}");
            }
        }
    }
}
