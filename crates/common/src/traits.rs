//! The worker entry contract.
//!
//! The controller never implements scanning itself; it launches opaque
//! workers through [`WorkerEntry`] and observes nothing from them beyond the
//! completion counts they push into their [`WorkerContext`] sink.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::Barrier;

use crate::types::{CompletionEvent, WorkerDescriptor};

/// Multi-producer side of the shared completion channel.
pub type CompletionSender = mpsc::UnboundedSender<CompletionEvent>;

/// Receiver side, consumed only by the stats aggregator.
pub type CompletionReceiver = mpsc::UnboundedReceiver<CompletionEvent>;

/// Everything one worker owns: its descriptor, its startup-barrier handle and
/// the shared completion sink.
pub struct WorkerContext {
    pub descriptor: WorkerDescriptor,
    barrier: Arc<Barrier>,
    sink: CompletionSender,
}

impl WorkerContext {
    #[must_use]
    pub fn new(descriptor: WorkerDescriptor, barrier: Arc<Barrier>, sink: CompletionSender) -> Self {
        Self {
            descriptor,
            barrier,
            sink,
        }
    }

    /// Arrive at the startup barrier and block until the whole cohort
    /// (every worker plus the controller) has arrived.
    ///
    /// Entries must call this after initializing their own state and before
    /// issuing their first scan request; an entry that skips it starts
    /// unsynchronized, and one that dies before reaching it hangs the cohort.
    pub async fn ready(&self) {
        self.barrier.wait().await;
    }

    /// Report a finished batch of `count` identifiers.
    ///
    /// Send failures are ignored: the aggregator going away only means nobody
    /// is listening anymore, which is not the worker's problem.
    #[inline]
    pub fn report(&self, count: u64) {
        let _ = self.sink.send(CompletionEvent::new(count));
    }
}

/// Worker entry point - all scanning implementations plug in through this.
#[async_trait]
pub trait WorkerEntry: Send + Sync {
    /// Run one worker to completion. The context is owned by the worker for
    /// its whole lifetime; there is no return value the controller observes.
    async fn run(&self, ctx: WorkerContext);

    /// Entry name, used in spawn logging.
    fn name(&self) -> &str {
        "worker"
    }
}
