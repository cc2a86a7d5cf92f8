//! In-memory collaborators for exercising the batch coordinator without a
//! server. Available to this crate's tests and, behind the `test-utils`
//! feature, to dependent crates.

use crate::batch_actions::ErrorNotifier;
use crate::common::ApiError;
use crate::model::{Workspace, WorkspaceBuild, WorkspaceTransition};
use crate::workspace_api::{WorkspaceApi, WorkspaceDirectory};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// One call received by [`RecordingApi`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub transition: WorkspaceTransition,
    pub workspace_id: String,
    pub template_version_id: Option<String>,
}

/// Records every lifecycle call and fails the ones aimed at chosen ids.
#[derive(Debug, Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<RecordedCall>>,
    failing: HashSet<String>,
    release: Option<Arc<Semaphore>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Calls are recorded immediately but only settle once a permit is added
    /// to the returned semaphore, one permit per call.
    pub fn held() -> (Self, Arc<Semaphore>) {
        let release = Arc::new(Semaphore::new(0));
        let api = Self {
            release: Some(release.clone()),
            ..Self::default()
        };
        (api, release)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    async fn record(
        &self,
        transition: WorkspaceTransition,
        workspace_id: &str,
        template_version_id: Option<&str>,
    ) -> Result<(), ApiError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                transition,
                workspace_id: workspace_id.to_string(),
                template_version_id: template_version_id.map(str::to_string),
            });
        }

        if let Some(release) = &self.release {
            if let Ok(permit) = release.acquire().await {
                permit.forget();
            }
        }

        if self.failing.contains(workspace_id) {
            Err(ApiError::RequestFailed {
                url: format!("/api/v2/workspaces/{workspace_id}/builds"),
                status: 500,
                body: format!("{transition} rejected"),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl WorkspaceApi for RecordingApi {
    async fn start_workspace(
        &self,
        workspace_id: &str,
        template_version_id: &str,
    ) -> Result<(), ApiError> {
        self.record(
            WorkspaceTransition::Start,
            workspace_id,
            Some(template_version_id),
        )
        .await
    }

    async fn stop_workspace(&self, workspace_id: &str) -> Result<(), ApiError> {
        self.record(WorkspaceTransition::Stop, workspace_id, None)
            .await
    }

    async fn delete_workspace(&self, workspace_id: &str) -> Result<(), ApiError> {
        self.record(WorkspaceTransition::Delete, workspace_id, None)
            .await
    }
}

/// Serves a fixed workspace list and counts how often it was asked for it.
#[derive(Debug, Default)]
pub struct FixedDirectory {
    workspaces: Vec<Workspace>,
    unavailable: bool,
    lists: AtomicUsize,
}

impl FixedDirectory {
    pub fn new(workspaces: Vec<Workspace>) -> Self {
        Self {
            workspaces,
            ..Self::default()
        }
    }

    /// Every listing fails with a 503.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn list_count(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkspaceDirectory for FixedDirectory {
    async fn list_workspaces(&self, _filter: Option<&str>) -> Result<Vec<Workspace>, ApiError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(ApiError::RequestFailed {
                url: "/api/v2/workspaces".to_string(),
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self.workspaces.clone())
    }
}

/// Collects notified messages in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl ErrorNotifier for RecordingNotifier {
    fn notify_error(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

/// Workspaces named after their ids, each with template version `tv-{id}`.
pub fn workspaces(ids: &[&str]) -> Vec<Workspace> {
    ids.iter()
        .map(|id| {
            Workspace::new(
                *id,
                format!("ws-{id}"),
                "tester",
                WorkspaceBuild::new(format!("tv-{id}")),
            )
        })
        .collect()
}
