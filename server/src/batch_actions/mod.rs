//! Batch lifecycle actions over a selection of workspaces
//!
//! - `types`: operation kinds and the aggregate batch outcome
//! - `in_flight`: per-kind busy counters with an RAII guard
//! - `notifier`: the user-visible error surface
//! - `coordinator`: dispatches one call per workspace and aggregates the results

pub mod coordinator;
pub mod in_flight;
pub mod notifier;
pub mod types;

pub use coordinator::{BatchActionCoordinator, SuccessHook};
pub use in_flight::{InFlightGuard, InFlightTracker};
pub use notifier::{ErrorNotifier, LogNotifier};
pub use types::{BatchOperationKind, BatchOutcome, ItemResult};
