//! Yantra Controller - worker-pool coordination
//!
//! Coordinates a fixed-size pool of scan workers: loads the shared proxy
//! pool, deals every worker a disjoint slice of the identifier space and of
//! the proxies, holds the cohort at an all-or-nothing startup barrier, and
//! aggregates completion counts into a rolling one-minute CPM figure.
//!
//! Scanning itself lives behind the `WorkerEntry` trait in `yantra-common`;
//! this crate never looks at scan results.

mod controller;
pub mod partition;
mod pool;
pub mod proxy;
mod stats;

pub use controller::Controller;
pub use pool::{Liveness, WorkerPool};
pub use proxy::{load_proxies, read_proxies, LoadedProxies};
pub use stats::{RateWindow, StatsAggregator, WINDOW};
