//! Types shared by the batch action coordinator and its callers.

use crate::common::ApiError;
use crate::model::WorkspaceTransition;

/// The three lifecycle actions that can be applied to a selection of
/// workspaces in one go.
///
/// Each kind is tracked independently for busy reporting, so a caller may in
/// principle have a stop batch and a delete batch outstanding at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchOperationKind {
    Start,
    Stop,
    Delete,
}

impl BatchOperationKind {
    pub const ALL: [BatchOperationKind; 3] = [
        BatchOperationKind::Start,
        BatchOperationKind::Stop,
        BatchOperationKind::Delete,
    ];

    pub fn verb(&self) -> &'static str {
        match self {
            BatchOperationKind::Start => "start",
            BatchOperationKind::Stop => "stop",
            BatchOperationKind::Delete => "delete",
        }
    }

    /// The single user-facing message shown when any call of the batch fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            BatchOperationKind::Start => "Failed to start workspaces",
            BatchOperationKind::Stop => "Failed to stop workspaces",
            BatchOperationKind::Delete => "Failed to delete workspaces",
        }
    }

    pub fn transition(&self) -> WorkspaceTransition {
        match self {
            BatchOperationKind::Start => WorkspaceTransition::Start,
            BatchOperationKind::Stop => WorkspaceTransition::Stop,
            BatchOperationKind::Delete => WorkspaceTransition::Delete,
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            BatchOperationKind::Start => 0,
            BatchOperationKind::Stop => 1,
            BatchOperationKind::Delete => 2,
        }
    }
}

impl std::fmt::Display for BatchOperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

/// Outcome of a single workspace call inside a batch.
pub type ItemResult = Result<(), ApiError>;

/// Aggregate verdict of a batch.
///
/// There is no partial variant: one failed call fails the whole
/// batch, and the caller is not told which workspaces were affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every call succeeded and the success hook has completed.
    Succeeded { dispatched: usize },
    /// At least one call failed; the failure notification has been raised.
    Failed,
}

impl BatchOutcome {
    /// Fold per-item results into the batch verdict.
    pub fn from_results(results: &[ItemResult]) -> Self {
        if results.iter().any(Result::is_err) {
            BatchOutcome::Failed
        } else {
            BatchOutcome::Succeeded {
                dispatched: results.len(),
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Succeeded { .. })
    }
}
