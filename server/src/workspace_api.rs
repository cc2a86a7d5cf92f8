use crate::common::ApiError;
use crate::model::{CreateWorkspaceBuildRequest, Workspace, WorkspacesResponse};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

const SESSION_TOKEN_HEADER: &str = "coder-session-token";
const WORKSPACES_PATH: &str = "/api/v2/workspaces";

/// Lifecycle calls the batch coordinator issues, one per workspace.
#[async_trait]
pub trait WorkspaceApi: Send + Sync {
    async fn start_workspace(
        &self,
        workspace_id: &str,
        template_version_id: &str,
    ) -> Result<(), ApiError>;

    async fn stop_workspace(&self, workspace_id: &str) -> Result<(), ApiError>;

    async fn delete_workspace(&self, workspace_id: &str) -> Result<(), ApiError>;
}

/// Source of the workspace list a selection is made from and refreshed against.
#[async_trait]
pub trait WorkspaceDirectory: Send + Sync {
    /// List workspaces visible to the session, optionally narrowed by a
    /// search filter such as `owner:me`.
    async fn list_workspaces(&self, filter: Option<&str>) -> Result<Vec<Workspace>, ApiError>;
}

/// HTTP client for the workspaces REST API.
#[derive(Debug, Clone)]
pub struct WorkspaceApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl WorkspaceApiClient {
    /// Builds a client that authenticates every request with `session_token`.
    ///
    /// `request_timeout` bounds each individual call; the batch layer above
    /// imposes no timeout of its own.
    pub fn new(
        base_url: &str,
        session_token: &str,
        request_timeout: Duration,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let mut token =
            HeaderValue::from_str(session_token).map_err(|e| ApiError::ClientCreation {
                reason: format!("invalid session token: {e}"),
            })?;
        token.set_sensitive(true);
        headers.insert(HeaderName::from_static(SESSION_TOKEN_HEADER), token);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()
            .map_err(|e| ApiError::ClientCreation {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn create_build(
        &self,
        workspace_id: &str,
        body: CreateWorkspaceBuildRequest,
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}{}/{}/builds",
            self.base_url,
            WORKSPACES_PATH,
            urlencoding::encode(workspace_id)
        );

        log::debug!("Requesting {} build for workspace {}", body.transition, workspace_id);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Transport {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::RequestFailed { url, status, body });
        }

        Ok(())
    }
}

#[async_trait]
impl WorkspaceApi for WorkspaceApiClient {
    async fn start_workspace(
        &self,
        workspace_id: &str,
        template_version_id: &str,
    ) -> Result<(), ApiError> {
        self.create_build(
            workspace_id,
            CreateWorkspaceBuildRequest::start(template_version_id),
        )
        .await
    }

    async fn stop_workspace(&self, workspace_id: &str) -> Result<(), ApiError> {
        self.create_build(workspace_id, CreateWorkspaceBuildRequest::stop())
            .await
    }

    async fn delete_workspace(&self, workspace_id: &str) -> Result<(), ApiError> {
        self.create_build(workspace_id, CreateWorkspaceBuildRequest::delete())
            .await
    }
}

#[async_trait]
impl WorkspaceDirectory for WorkspaceApiClient {
    async fn list_workspaces(&self, filter: Option<&str>) -> Result<Vec<Workspace>, ApiError> {
        let url = format!("{}{}", self.base_url, WORKSPACES_PATH);

        let mut request = self.client.get(&url);
        if let Some(filter) = filter {
            request = request.query(&[("q", filter)]);
        }

        let response = request.send().await.map_err(|e| ApiError::Transport {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::RequestFailed { url, status, body });
        }

        let list: WorkspacesResponse =
            response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse {
                    url: url.clone(),
                    reason: e.to_string(),
                })?;

        log::debug!(
            "Listed {} workspaces (server reported {})",
            list.workspaces.len(),
            list.count
        );
        Ok(list.workspaces)
    }
}
