use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A remote workspace as returned by the workspaces API.
///
/// Only the fields needed to dispatch lifecycle transitions and to describe
/// the workspace in logs are modelled; unknown fields are ignored on
/// deserialization.
///
/// # Examples
///
/// ```no_run
/// use server::model::{Workspace, WorkspaceBuild};
///
/// let workspace = Workspace::new(
///     "6b1f3c0e-0000-4000-8000-000000000001",
///     "dev",
///     "alice",
///     WorkspaceBuild::new("tv-1"),
/// );
/// assert_eq!(workspace.display_name(), "alice/dev");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub owner_name: String,
    pub latest_build: WorkspaceBuild,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Workspace {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        owner_name: impl Into<String>,
        latest_build: WorkspaceBuild,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            owner_name: owner_name.into(),
            latest_build,
            created_at: None,
            updated_at: None,
        }
    }

    /// `owner/name`, or just the name when the owner is unknown.
    pub fn display_name(&self) -> String {
        if self.owner_name.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.owner_name, self.name)
        }
    }

    /// Template version a start transition must build against.
    pub fn template_version_id(&self) -> &str {
        &self.latest_build.template_version_id
    }
}

/// The most recent build of a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceBuild {
    pub template_version_id: String,
    #[serde(default)]
    pub transition: Option<WorkspaceTransition>,
    #[serde(default)]
    pub status: Option<String>,
}

impl WorkspaceBuild {
    pub fn new(template_version_id: impl Into<String>) -> Self {
        Self {
            template_version_id: template_version_id.into(),
            transition: None,
            status: None,
        }
    }
}

/// Lifecycle transition requested when creating a workspace build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceTransition {
    Start,
    Stop,
    Delete,
}

impl WorkspaceTransition {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceTransition::Start => "start",
            WorkspaceTransition::Stop => "stop",
            WorkspaceTransition::Delete => "delete",
        }
    }
}

impl std::fmt::Display for WorkspaceTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/v2/workspaces/{id}/builds`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateWorkspaceBuildRequest {
    pub transition: WorkspaceTransition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_version_id: Option<String>,
}

impl CreateWorkspaceBuildRequest {
    pub fn start(template_version_id: impl Into<String>) -> Self {
        Self {
            transition: WorkspaceTransition::Start,
            template_version_id: Some(template_version_id.into()),
        }
    }

    pub fn stop() -> Self {
        Self {
            transition: WorkspaceTransition::Stop,
            template_version_id: None,
        }
    }

    pub fn delete() -> Self {
        Self {
            transition: WorkspaceTransition::Delete,
            template_version_id: None,
        }
    }
}

/// Response of `GET /api/v2/workspaces`.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspacesResponse {
    pub workspaces: Vec<Workspace>,
    #[serde(default)]
    pub count: usize,
}
