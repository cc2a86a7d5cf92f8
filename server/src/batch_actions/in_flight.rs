use super::types::BatchOperationKind;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts outstanding batches per operation kind.
///
/// Cloning is cheap and every clone observes the same counters, so a caller
/// can keep a tracker around to drive a loading indicator while a batch is
/// being awaited elsewhere.
#[derive(Debug, Clone, Default)]
pub struct InFlightTracker {
    counters: Arc<[AtomicUsize; 3]>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a batch of `kind` as dispatched until the returned guard drops.
    pub fn begin(&self, kind: BatchOperationKind) -> InFlightGuard {
        let previous = self.counters[kind.index()].fetch_add(1, Ordering::SeqCst);
        log::debug!("Batch {kind} in flight (outstanding: {})", previous + 1);
        InFlightGuard {
            counters: Arc::clone(&self.counters),
            kind,
        }
    }

    pub fn in_flight(&self, kind: BatchOperationKind) -> usize {
        self.counters[kind.index()].load(Ordering::SeqCst)
    }

    pub fn is_kind_busy(&self, kind: BatchOperationKind) -> bool {
        self.in_flight(kind) > 0
    }

    /// True while any kind has an unsettled batch.
    pub fn is_busy(&self) -> bool {
        BatchOperationKind::ALL
            .iter()
            .any(|kind| self.is_kind_busy(*kind))
    }
}

/// RAII marker for one outstanding batch.
///
/// Dropping it settles the batch, which also covers the awaiting future
/// being dropped before completion.
#[derive(Debug)]
pub struct InFlightGuard {
    counters: Arc<[AtomicUsize; 3]>,
    kind: BatchOperationKind,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let previous = self.counters[self.kind.index()].fetch_sub(1, Ordering::SeqCst);
        log::debug!(
            "Batch {} settled (outstanding: {})",
            self.kind,
            previous.saturating_sub(1)
        );
    }
}
