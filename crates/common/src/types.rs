//! Core data types for the Yantra scan controller.
//!
//! Everything here is constructed once, before any worker spawns, and is
//! read-only afterwards. Workers receive exclusively-owned copies of their
//! slices at spawn time, so none of these types needs interior mutability.
//!
//! NOTE: `CompletionEvent` carries an `Instant` rather than `SystemTime`
//! because the rate window only ever compares event ages against each other;
//! it is therefore not serde-serializable, unlike the config types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant, SystemTime};
use uuid::Uuid;

use crate::error::YantraError;

/// Single upstream proxy (`host:port`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProxyEntry {
    pub host: String,
    pub port: u16,
}

impl ProxyEntry {
    #[inline]
    #[must_use]
    pub fn new<S: Into<String>>(host: S, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for ProxyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Half-open identifier interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdRange {
    pub start: u64,
    pub end: u64,
}

impl IdRange {
    #[inline]
    #[must_use]
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of identifiers covered by the range.
    #[inline]
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for IdRange {
    type Err = YantraError;

    /// Parses `"START-END"` into a half-open range.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| YantraError::InvalidRange(s.to_string()))?;
        let start: u64 = start
            .trim()
            .parse()
            .map_err(|_| YantraError::InvalidRange(s.to_string()))?;
        let end: u64 = end
            .trim()
            .parse()
            .map_err(|_| YantraError::InvalidRange(s.to_string()))?;
        if end < start {
            return Err(YantraError::InvalidRange(s.to_string()));
        }
        Ok(Self { start, end })
    }
}

/// Scan session configuration.
///
/// Built by the CLI (or embedding program) before the controller starts and
/// never mutated afterwards. Fields are `pub` so the controller and workers
/// can read them without accessor overhead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Number of worker tasks to spawn.
    pub workers: usize,
    /// Scan threads each worker runs internally.
    pub threads: usize,
    /// Global identifier ranges; each is partitioned across all workers.
    pub ranges: Vec<IdRange>,
    /// Identifier cutoff below which workers skip scanning.
    pub cutoff: u64,
    /// Identifiers claimed per batch.
    pub chunk_size: u64,
    /// Whether workers should perform the fund check on hits.
    pub check_funds: bool,
    /// Webhook notified by workers on hits.
    pub webhook_url: Option<String>,
    /// Per-request timeout applied inside workers.
    pub timeout: Duration,
    /// Optional `host:port`-per-line proxy source; `None` means workers
    /// connect directly.
    pub proxy_file: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            threads: 16,
            ranges: Vec::new(),
            cutoff: 0,
            chunk_size: 100,
            check_funds: false,
            webhook_url: None,
            timeout: Duration::from_secs(5),
            proxy_file: None,
        }
    }
}

impl ScanConfig {
    #[inline]
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_ranges(mut self, ranges: Vec<IdRange>) -> Self {
        self.ranges = ranges;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_proxy_file(mut self, path: PathBuf) -> Self {
        self.proxy_file = Some(path);
        self
    }

    /// Total identifiers covered by all configured ranges.
    #[inline]
    #[must_use]
    pub fn total_ids(&self) -> u64 {
        self.ranges.iter().map(IdRange::len).sum()
    }
}

/// Immutable bundle handed to one worker at spawn time.
///
/// Owned exclusively by that worker for its whole lifetime; the controller
/// keeps no reference once the worker is launched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerDescriptor {
    /// Worker index in `[0, workers)`.
    pub index: usize,
    /// This worker's disjoint slice of the proxy pool.
    pub proxies: Vec<ProxyEntry>,
    /// This worker's disjoint slice of every configured range.
    pub ranges: Vec<IdRange>,
    pub threads: usize,
    pub cutoff: u64,
    pub chunk_size: u64,
    pub check_funds: bool,
    pub webhook_url: Option<String>,
    pub timeout: Duration,
}

/// One batch-completion report emitted by a worker.
#[derive(Debug, Clone, Copy)]
pub struct CompletionEvent {
    /// When the batch finished.
    pub at: Instant,
    /// Identifiers covered by the batch.
    pub count: u64,
}

impl CompletionEvent {
    #[inline]
    #[must_use]
    pub fn new(count: u64) -> Self {
        Self {
            at: Instant::now(),
            count,
        }
    }

    /// Event with an explicit timestamp; the aggregator's window math is
    /// driven entirely by these.
    #[inline]
    #[must_use]
    pub fn at(at: Instant, count: u64) -> Self {
        Self { at, count }
    }
}

/// One controller run: configuration plus identity for log correlation.
#[derive(Debug, Clone)]
pub struct ScanSession {
    pub id: Uuid,
    pub config: ScanConfig,
    pub created_at: SystemTime,
}

impl ScanSession {
    #[inline]
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            created_at: SystemTime::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_parses_start_end() {
        let r: IdRange = "100-250".parse().unwrap();
        assert_eq!(r, IdRange::new(100, 250));
        assert_eq!(r.len(), 150);
    }

    #[test]
    fn range_rejects_garbage() {
        assert!("100".parse::<IdRange>().is_err());
        assert!("abc-def".parse::<IdRange>().is_err());
        assert!("50-10".parse::<IdRange>().is_err());
    }

    #[test]
    fn empty_range_has_zero_len() {
        let r = IdRange::new(7, 7);
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
    }

    #[test]
    fn config_serializes_for_session_logging() {
        let cfg = ScanConfig::default().with_ranges(vec![IdRange::new(5, 9)]);
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"start\":5"));
        let back: ScanConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ranges, cfg.ranges);
    }

    #[test]
    fn config_totals_span_all_ranges() {
        let cfg = ScanConfig::default()
            .with_ranges(vec![IdRange::new(0, 10), IdRange::new(100, 130)]);
        assert_eq!(cfg.total_ids(), 40);
    }
}
