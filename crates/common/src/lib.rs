//! Yantra Common - Shared types and traits
//!
//! This crate provides the core types, the worker entry contract and the
//! error taxonomy used across the Yantra scan-controller workspace.
//!
//! Key pieces:
//! - Immutable configuration and per-worker descriptor types
//! - The `WorkerEntry` trait through which scanning implementations plug in
//! - Completion-channel aliases shared by workers and the stats aggregator

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{YantraError, YantraResult};
pub use traits::{CompletionReceiver, CompletionSender, WorkerContext, WorkerEntry};
pub use types::{
    CompletionEvent, IdRange, ProxyEntry, ScanConfig, ScanSession, WorkerDescriptor,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
