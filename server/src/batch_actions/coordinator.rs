use super::in_flight::InFlightTracker;
use super::notifier::ErrorNotifier;
use super::types::{BatchOperationKind, BatchOutcome, ItemResult};
use crate::model::Workspace;
use crate::workspace_api::WorkspaceApi;
use futures::future::{self, BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

/// Refresh hook awaited after a batch in which every call succeeded.
pub type SuccessHook = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Applies start, stop or delete to a selection of workspaces.
///
/// Every batch issues one call per workspace, all of them concurrently, and
/// waits for the whole group to settle. A failed call never short-circuits its
/// siblings. The batch as a whole succeeds only when every call succeeded, in
/// which case the success hook runs; otherwise a single notification naming
/// the operation is raised and the hook is skipped.
///
/// # Examples
///
/// ```no_run
/// use server::batch_actions::{BatchActionCoordinator, LogNotifier};
/// use server::workspace_api::WorkspaceApiClient;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # async fn run(workspaces: Vec<server::model::Workspace>) -> Result<(), Box<dyn std::error::Error>> {
/// let api = WorkspaceApiClient::new("https://coder.example.com", "token", Duration::from_secs(30))?;
/// let coordinator = BatchActionCoordinator::new(Arc::new(api), Arc::new(LogNotifier))
///     .with_success_hook(|| async { log::info!("refreshing workspace list") });
///
/// let outcome = coordinator.stop_all(&workspaces).await;
/// assert!(!coordinator.is_busy());
/// # let _ = outcome;
/// # Ok(())
/// # }
/// ```
pub struct BatchActionCoordinator {
    api: Arc<dyn WorkspaceApi>,
    notifier: Arc<dyn ErrorNotifier>,
    on_success: SuccessHook,
    in_flight: InFlightTracker,
}

impl BatchActionCoordinator {
    pub fn new(api: Arc<dyn WorkspaceApi>, notifier: Arc<dyn ErrorNotifier>) -> Self {
        Self {
            api,
            notifier,
            on_success: Arc::new(|| future::ready(()).boxed()),
            in_flight: InFlightTracker::new(),
        }
    }

    /// Set the refresh hook run after each fully successful batch.
    pub fn with_success_hook<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_success = Arc::new(move || hook().boxed());
        self
    }

    /// True while a batch of any kind has unsettled calls.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_busy()
    }

    pub fn is_kind_busy(&self, kind: BatchOperationKind) -> bool {
        self.in_flight.is_kind_busy(kind)
    }

    /// Shared view of the busy counters, for observers that outlive a borrow
    /// of the coordinator.
    pub fn in_flight(&self) -> InFlightTracker {
        self.in_flight.clone()
    }

    pub async fn start_all(&self, workspaces: &[Workspace]) -> BatchOutcome {
        self.run(BatchOperationKind::Start, workspaces).await
    }

    pub async fn stop_all(&self, workspaces: &[Workspace]) -> BatchOutcome {
        self.run(BatchOperationKind::Stop, workspaces).await
    }

    pub async fn delete_all(&self, workspaces: &[Workspace]) -> BatchOutcome {
        self.run(BatchOperationKind::Delete, workspaces).await
    }

    pub async fn run(&self, kind: BatchOperationKind, workspaces: &[Workspace]) -> BatchOutcome {
        // Held until the hook has finished: the batch is not complete before that.
        let _in_flight = self.in_flight.begin(kind);

        if workspaces.is_empty() {
            log::warn!("No workspaces provided for batch {kind}");
        }

        log::info!(
            "Starting batch {kind}: dispatching {} workspace calls",
            workspaces.len()
        );

        let results: Vec<ItemResult> =
            future::join_all(workspaces.iter().map(|w| self.dispatch(kind, w))).await;

        let outcome = BatchOutcome::from_results(&results);
        match outcome {
            BatchOutcome::Succeeded { dispatched } => {
                log::info!("Batch {kind} completed: {dispatched} workspace calls succeeded");
                (self.on_success)().await;
            }
            BatchOutcome::Failed => {
                let failed = results.iter().filter(|r| r.is_err()).count();
                log::error!(
                    "Batch {kind} failed: {failed} of {} workspace calls failed",
                    results.len()
                );
                self.notifier.notify_error(kind.failure_message());
            }
        }

        outcome
    }

    async fn dispatch(&self, kind: BatchOperationKind, workspace: &Workspace) -> ItemResult {
        let result = match kind {
            BatchOperationKind::Start => {
                self.api
                    .start_workspace(&workspace.id, workspace.template_version_id())
                    .await
            }
            BatchOperationKind::Stop => self.api.stop_workspace(&workspace.id).await,
            BatchOperationKind::Delete => self.api.delete_workspace(&workspace.id).await,
        };

        if let Err(e) = &result {
            log::warn!(
                "Failed to {} workspace {} ({}): {e}",
                kind.verb(),
                workspace.display_name(),
                workspace.id
            );
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WorkspaceTransition;
    use crate::testing::{RecordingApi, RecordingNotifier, workspaces};
    use claims::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    mod helpers {
        use super::*;

        pub fn coordinator_with(
            api: Arc<RecordingApi>,
            notifier: Arc<RecordingNotifier>,
            refreshes: Arc<AtomicUsize>,
        ) -> BatchActionCoordinator {
            BatchActionCoordinator::new(api, notifier).with_success_hook(move || {
                let refreshes = refreshes.clone();
                async move {
                    refreshes.fetch_add(1, Ordering::SeqCst);
                }
            })
        }

        pub async fn wait_for_calls(api: &RecordingApi, expected: usize) {
            for _ in 0..200 {
                if api.call_count() >= expected {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            panic!(
                "expected {expected} calls, saw {} before timing out",
                api.call_count()
            );
        }
    }

    mod unit {
        use super::helpers::*;
        use super::*;

        #[tokio::test]
        async fn test_start_all_uses_template_version() {
            let api = Arc::new(RecordingApi::new());
            let notifier = Arc::new(RecordingNotifier::new());
            let refreshes = Arc::new(AtomicUsize::new(0));
            let coordinator = coordinator_with(api.clone(), notifier.clone(), refreshes.clone());

            let outcome = coordinator.start_all(&workspaces(&["a", "b"])).await;

            assert_eq!(outcome, BatchOutcome::Succeeded { dispatched: 2 });
            let calls = api.calls();
            assert_eq!(calls.len(), 2);
            for call in &calls {
                assert_eq!(call.transition, WorkspaceTransition::Start);
                assert_eq!(
                    call.template_version_id.as_deref(),
                    Some(format!("tv-{}", call.workspace_id).as_str())
                );
            }
            assert_eq!(refreshes.load(Ordering::SeqCst), 1);
            assert!(notifier.messages().is_empty());
        }

        #[tokio::test]
        async fn test_stop_and_delete_issue_matching_transitions() {
            let api = Arc::new(RecordingApi::new());
            let notifier = Arc::new(RecordingNotifier::new());
            let refreshes = Arc::new(AtomicUsize::new(0));
            let coordinator = coordinator_with(api.clone(), notifier, refreshes.clone());

            assert!(coordinator.stop_all(&workspaces(&["a"])).await.is_success());
            assert!(coordinator.delete_all(&workspaces(&["b"])).await.is_success());

            let calls = api.calls();
            assert_eq!(calls.len(), 2);
            assert_eq!(calls[0].transition, WorkspaceTransition::Stop);
            assert_eq!(calls[0].workspace_id, "a");
            assert_none!(calls[0].template_version_id.as_ref());
            assert_eq!(calls[1].transition, WorkspaceTransition::Delete);
            assert_eq!(calls[1].workspace_id, "b");
            assert_eq!(refreshes.load(Ordering::SeqCst), 2);
        }

        #[tokio::test]
        async fn test_stop_all_with_one_failure_reports_once() {
            let api = Arc::new(RecordingApi::failing_on(&["b"]));
            let notifier = Arc::new(RecordingNotifier::new());
            let refreshes = Arc::new(AtomicUsize::new(0));
            let coordinator = coordinator_with(api.clone(), notifier.clone(), refreshes.clone());

            let outcome = coordinator.stop_all(&workspaces(&["a", "b", "c"])).await;

            assert_eq!(outcome, BatchOutcome::Failed);
            assert_eq!(api.call_count(), 3);
            assert_eq!(notifier.messages(), vec!["Failed to stop workspaces".to_string()]);
            assert_eq!(refreshes.load(Ordering::SeqCst), 0);
            assert!(!coordinator.is_busy());
        }

        #[tokio::test]
        async fn test_many_failures_still_single_notification() {
            let api = Arc::new(RecordingApi::failing_on(&["a", "b", "c"]));
            let notifier = Arc::new(RecordingNotifier::new());
            let refreshes = Arc::new(AtomicUsize::new(0));
            let coordinator = coordinator_with(api.clone(), notifier.clone(), refreshes.clone());

            let outcome = coordinator.delete_all(&workspaces(&["a", "b", "c"])).await;

            assert_eq!(outcome, BatchOutcome::Failed);
            assert_eq!(
                notifier.messages(),
                vec!["Failed to delete workspaces".to_string()]
            );
            assert_eq!(refreshes.load(Ordering::SeqCst), 0);
        }

        #[tokio::test]
        async fn test_empty_selection_succeeds_without_calls() {
            let api = Arc::new(RecordingApi::new());
            let notifier = Arc::new(RecordingNotifier::new());
            let refreshes = Arc::new(AtomicUsize::new(0));
            let coordinator = coordinator_with(api.clone(), notifier.clone(), refreshes.clone());

            let outcome = coordinator.start_all(&[]).await;

            assert_eq!(outcome, BatchOutcome::Succeeded { dispatched: 0 });
            assert_eq!(api.call_count(), 0);
            assert_eq!(refreshes.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_default_hook_is_noop() {
            let api = Arc::new(RecordingApi::new());
            let notifier = Arc::new(RecordingNotifier::new());
            let coordinator = BatchActionCoordinator::new(api.clone(), notifier);

            let outcome = coordinator.stop_all(&workspaces(&["a"])).await;
            assert!(outcome.is_success());
        }
    }

    mod concurrency {
        use super::helpers::*;
        use super::*;

        #[tokio::test]
        async fn test_busy_until_every_call_settles() {
            let (api, release) = RecordingApi::held();
            let api = Arc::new(api);
            let notifier = Arc::new(RecordingNotifier::new());
            let refreshes = Arc::new(AtomicUsize::new(0));
            let coordinator = Arc::new(coordinator_with(
                api.clone(),
                notifier,
                refreshes.clone(),
            ));
            assert!(!coordinator.is_busy());

            let task = {
                let coordinator = coordinator.clone();
                let selection = workspaces(&["a", "b", "c"]);
                tokio::spawn(async move { coordinator.stop_all(&selection).await })
            };

            // All three calls are dispatched before any of them settles.
            wait_for_calls(&api, 3).await;
            assert!(coordinator.is_busy());
            assert!(coordinator.is_kind_busy(BatchOperationKind::Stop));

            release.add_permits(2);
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert!(coordinator.is_busy());
            assert_eq!(refreshes.load(Ordering::SeqCst), 0);

            release.add_permits(1);
            let outcome = task.await.unwrap();

            assert!(outcome.is_success());
            assert!(!coordinator.is_busy());
            assert_eq!(refreshes.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_hook_runs_while_batch_still_busy() {
            let api = Arc::new(RecordingApi::new());
            let notifier = Arc::new(RecordingNotifier::new());
            let observed_busy = Arc::new(AtomicUsize::new(0));

            let tracker_slot: Arc<std::sync::OnceLock<InFlightTracker>> =
                Arc::new(std::sync::OnceLock::new());
            let coordinator = {
                let observed_busy = observed_busy.clone();
                let tracker_slot = tracker_slot.clone();
                BatchActionCoordinator::new(api, notifier).with_success_hook(move || {
                    let busy = tracker_slot.get().is_some_and(|t| t.is_busy());
                    if busy {
                        observed_busy.fetch_add(1, Ordering::SeqCst);
                    }
                    async {}
                })
            };
            let _ = tracker_slot.set(coordinator.in_flight());

            coordinator.start_all(&workspaces(&["a"])).await;

            assert_eq!(observed_busy.load(Ordering::SeqCst), 1);
            assert!(!coordinator.is_busy());
        }

        #[tokio::test]
        async fn test_failure_does_not_block_other_kinds() {
            let api = Arc::new(RecordingApi::failing_on(&["x"]));
            let notifier = Arc::new(RecordingNotifier::new());
            let refreshes = Arc::new(AtomicUsize::new(0));
            let coordinator = coordinator_with(api.clone(), notifier.clone(), refreshes.clone());

            let to_stop = workspaces(&["x"]);
            let to_start = workspaces(&["y", "z"]);
            let (stop, start) = tokio::join!(
                coordinator.stop_all(&to_stop),
                coordinator.start_all(&to_start)
            );

            assert_eq!(stop, BatchOutcome::Failed);
            assert_eq!(start, BatchOutcome::Succeeded { dispatched: 2 });
            assert_eq!(notifier.messages(), vec!["Failed to stop workspaces".to_string()]);
            assert_eq!(refreshes.load(Ordering::SeqCst), 1);
            assert!(!coordinator.is_busy());
        }
    }

    mod properties {
        use super::helpers::*;
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashSet;

        fn runtime() -> tokio::runtime::Runtime {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap()
        }

        proptest! {
            #[test]
            fn test_one_call_per_workspace(
                ids in prop::collection::hash_set("[a-z]{1,8}", 0..20),
                kind_index in 0usize..3
            ) {
                let ids: Vec<String> = ids.into_iter().collect();
                let kind = BatchOperationKind::ALL[kind_index];
                let api = Arc::new(RecordingApi::new());
                let notifier = Arc::new(RecordingNotifier::new());
                let refreshes = Arc::new(AtomicUsize::new(0));
                let coordinator = coordinator_with(api.clone(), notifier, refreshes.clone());

                let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
                let outcome = runtime().block_on(coordinator.run(kind, &workspaces(&id_refs)));

                prop_assert!(outcome.is_success());
                prop_assert_eq!(api.call_count(), ids.len());
                let called: HashSet<String> =
                    api.calls().into_iter().map(|c| c.workspace_id).collect();
                let expected: HashSet<String> = ids.iter().cloned().collect();
                prop_assert_eq!(called, expected);
                prop_assert!(api.calls().iter().all(|c| c.transition == kind.transition()));
                prop_assert_eq!(refreshes.load(Ordering::SeqCst), 1);
            }

            #[test]
            fn test_any_failure_fails_whole_batch(
                total in 1usize..15,
                failing_mask in prop::collection::vec(any::<bool>(), 15)
            ) {
                let ids: Vec<String> = (0..total).map(|i| format!("ws-{i}")).collect();
                let failing: Vec<&str> = ids
                    .iter()
                    .zip(failing_mask.iter())
                    .filter(|(_, fail)| **fail)
                    .map(|(id, _)| id.as_str())
                    .collect();
                let any_failed = !failing.is_empty();

                let api = Arc::new(RecordingApi::failing_on(&failing));
                let notifier = Arc::new(RecordingNotifier::new());
                let refreshes = Arc::new(AtomicUsize::new(0));
                let coordinator = coordinator_with(api.clone(), notifier.clone(), refreshes.clone());

                let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
                let outcome = runtime().block_on(coordinator.stop_all(&workspaces(&id_refs)));

                prop_assert_eq!(api.call_count(), total);
                prop_assert_eq!(outcome.is_success(), !any_failed);
                prop_assert_eq!(notifier.messages().len(), usize::from(any_failed));
                prop_assert_eq!(refreshes.load(Ordering::SeqCst), usize::from(!any_failed));
                prop_assert!(!coordinator.is_busy());
            }
        }
    }
}
