//! Completion-rate aggregation.
//!
//! A single background task drains the shared completion channel and keeps a
//! trailing 60-second window of batch counts. Every event produces one
//! `CPM: <n>` log line; nothing else ever reads the window.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info};

use yantra_common::{CompletionEvent, CompletionReceiver};

use crate::pool::Liveness;

/// Trailing window width for the CPM figure.
pub const WINDOW: Duration = Duration::from_secs(60);

/// How often the aggregator re-checks worker liveness while the channel is
/// quiet.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Sliding window over completion events.
///
/// Pruning is driven by the newest event's own timestamp, not by wall clock
/// at prune time, which keeps the window a pure function of its inputs.
#[derive(Debug)]
pub struct RateWindow {
    window: Duration,
    events: VecDeque<CompletionEvent>,
}

impl RateWindow {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            events: VecDeque::new(),
        }
    }

    /// Fold one event into the window and return the updated CPM.
    pub fn push(&mut self, event: CompletionEvent) -> u64 {
        let newest = event.at;
        self.events.push_back(event);
        // checked_sub: an Instant within the first 60s of the process has no
        // cutoff yet, so everything is retained.
        if let Some(cutoff) = newest.checked_sub(self.window) {
            self.events.retain(|e| e.at > cutoff);
        }
        self.cpm()
    }

    /// Sum of counts currently inside the window.
    #[must_use]
    pub fn cpm(&self) -> u64 {
        self.events.iter().map(|e| e.count).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Background consumer of the completion channel.
pub struct StatsAggregator {
    window: Duration,
    poll: Duration,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self {
            window: WINDOW,
            poll: POLL_INTERVAL,
        }
    }
}

impl StatsAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }

    /// Spawn the aggregation loop. It runs until either every worker has
    /// exited (checked before each blocking read, so an empty channel cannot
    /// deadlock it) or the channel closes.
    pub fn spawn(self, rx: CompletionReceiver, liveness: Liveness) -> JoinHandle<()> {
        tokio::spawn(self.run(rx, liveness))
    }

    async fn run(self, mut rx: CompletionReceiver, liveness: Liveness) {
        let mut window = RateWindow::new(self.window);
        while liveness.any_alive() {
            match timeout(self.poll, rx.recv()).await {
                Ok(Some(event)) => {
                    info!("CPM: {}", window.push(event));
                }
                // All senders gone: no more events can ever arrive.
                Ok(None) => break,
                // Quiet interval; loop around and re-check liveness.
                Err(_) => continue,
            }
        }
        debug!("Stats aggregator stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::sync::mpsc;

    #[test]
    fn window_drops_events_older_than_sixty_seconds() {
        let base = Instant::now();
        let mut window = RateWindow::new(WINDOW);

        assert_eq!(window.push(CompletionEvent::at(base, 5)), 5);
        assert_eq!(
            window.push(CompletionEvent::at(base + Duration::from_secs(30), 3)),
            8
        );
        // First event is now 70s old relative to the newest: out.
        assert_eq!(
            window.push(CompletionEvent::at(base + Duration::from_secs(70), 2)),
            5
        );
    }

    #[test]
    fn window_excludes_exact_boundary() {
        let base = Instant::now();
        let mut window = RateWindow::new(WINDOW);
        window.push(CompletionEvent::at(base, 5));
        // Exactly 60s old counts as expired.
        assert_eq!(
            window.push(CompletionEvent::at(base + Duration::from_secs(60), 1)),
            1
        );
    }

    #[test]
    fn empty_window_reports_zero() {
        let window = RateWindow::new(WINDOW);
        assert!(window.is_empty());
        assert_eq!(window.cpm(), 0);
    }

    /// With no live workers and an empty channel, the loop must exit within
    /// one poll cycle - no event is needed to unblock it.
    #[tokio::test]
    async fn aggregator_exits_when_no_workers_alive() {
        let (tx, rx) = mpsc::unbounded_channel();
        let liveness = Liveness::new();

        let poll = Duration::from_millis(20);
        let handle = StatsAggregator::new().with_poll_interval(poll).spawn(rx, liveness);

        tokio::time::timeout(poll * 3, handle)
            .await
            .expect("aggregator did not stop")
            .unwrap();
        drop(tx);
    }

    /// A closed channel stops the loop even while workers are still counted
    /// as alive.
    #[tokio::test]
    async fn aggregator_exits_on_channel_close() {
        let (tx, rx) = mpsc::unbounded_channel();
        let liveness = Liveness::new();
        let guard = liveness.register();

        let handle = StatsAggregator::new()
            .with_poll_interval(Duration::from_millis(20))
            .spawn(rx, liveness);
        drop(tx);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("aggregator did not stop")
            .unwrap();
        drop(guard);
    }

    /// Events flow through the aggregator while any worker is alive.
    #[tokio::test]
    async fn aggregator_consumes_events_while_workers_alive() {
        let (tx, rx) = mpsc::unbounded_channel();
        let liveness = Liveness::new();
        let guard = liveness.register();

        let handle = StatsAggregator::new()
            .with_poll_interval(Duration::from_millis(20))
            .spawn(rx, liveness);

        tx.send(CompletionEvent::new(4)).unwrap();
        tx.send(CompletionEvent::new(6)).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        drop(guard);
        drop(tx);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("aggregator did not stop")
            .unwrap();
    }
}
