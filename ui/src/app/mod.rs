//! Command orchestration for the `wsctl` front end.
//!
//! [`App`] owns the workspace listing, the batch coordinator and the delete
//! confirmation gate, and runs one [`Command`] against them.

pub mod prompt;
pub mod selection;

pub use prompt::{DeletePrompt, PromptOutcome};
pub use selection::Selection;

use crate::components::delete_confirmation::DeleteConfirmationGate;
use crate::error::{AppError, AppResult};
use server::batch_actions::{
    BatchActionCoordinator, BatchOperationKind, BatchOutcome, ErrorNotifier,
};
use server::model::Workspace;
use server::workspace_api::{WorkspaceApi, WorkspaceDirectory};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the listing, as JSON when `json` is set.
    List { json: bool },
    Start(Selection),
    Stop(Selection),
    Delete(Selection),
}

/// What running a command amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Listed { count: usize },
    Batch(BatchOutcome),
    /// The delete confirmation was dismissed before anything was dispatched.
    Cancelled,
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            CommandOutcome::Listed { .. } | CommandOutcome::Cancelled => true,
            CommandOutcome::Batch(outcome) => outcome.is_success(),
        }
    }
}

pub struct App {
    directory: Arc<dyn WorkspaceDirectory>,
    filter: Option<String>,
    workspaces: Arc<RwLock<Vec<Workspace>>>,
    coordinator: BatchActionCoordinator,
    gate: DeleteConfirmationGate,
}

impl App {
    /// Wire the coordinator so that every fully successful batch re-lists
    /// workspaces into the cached listing.
    pub fn new(
        api: Arc<dyn WorkspaceApi>,
        directory: Arc<dyn WorkspaceDirectory>,
        notifier: Arc<dyn ErrorNotifier>,
        filter: Option<String>,
    ) -> Self {
        let workspaces = Arc::new(RwLock::new(Vec::new()));

        let hook_directory = directory.clone();
        let hook_filter = filter.clone();
        let hook_cache = workspaces.clone();
        let coordinator =
            BatchActionCoordinator::new(api, notifier).with_success_hook(move || {
                let directory = hook_directory.clone();
                let filter = hook_filter.clone();
                let cache = hook_cache.clone();
                async move {
                    match directory.list_workspaces(filter.as_deref()).await {
                        Ok(listed) => {
                            log::info!("Refreshed workspace list: {} workspaces", listed.len());
                            *cache.write().await = listed;
                        }
                        Err(e) => log::warn!("Failed to refresh workspace list: {e}"),
                    }
                }
            });

        Self {
            directory,
            filter,
            workspaces,
            coordinator,
            gate: DeleteConfirmationGate::new(),
        }
    }

    pub fn coordinator(&self) -> &BatchActionCoordinator {
        &self.coordinator
    }

    pub fn gate(&self) -> &DeleteConfirmationGate {
        &self.gate
    }

    /// Last listing, as of the most recent refresh.
    pub async fn workspaces(&self) -> Vec<Workspace> {
        self.workspaces.read().await.clone()
    }

    pub async fn refresh(&self) -> AppResult<Vec<Workspace>> {
        let listed = self
            .directory
            .list_workspaces(self.filter.as_deref())
            .await?;
        *self.workspaces.write().await = listed.clone();
        Ok(listed)
    }

    pub async fn run<R, W>(
        &mut self,
        command: Command,
        input: R,
        mut output: W,
    ) -> AppResult<CommandOutcome>
    where
        R: BufRead,
        W: Write,
    {
        log::debug!("Running command {command:?}");

        match command {
            Command::List { json } => {
                let listed = self.refresh().await?;
                if json {
                    let rendered = serde_json::to_string_pretty(&listed)
                        .map_err(|e| AppError::Io(e.to_string()))?;
                    writeln!(output, "{rendered}")?;
                } else {
                    write_listing(&mut output, &listed)?;
                }
                Ok(CommandOutcome::Listed {
                    count: listed.len(),
                })
            }
            Command::Start(selection) => {
                self.run_batch(BatchOperationKind::Start, &selection, &mut output)
                    .await
            }
            Command::Stop(selection) => {
                self.run_batch(BatchOperationKind::Stop, &selection, &mut output)
                    .await
            }
            Command::Delete(selection) => self.run_delete(&selection, input, output).await,
        }
    }

    async fn run_batch<W: Write>(
        &self,
        kind: BatchOperationKind,
        selection: &Selection,
        output: &mut W,
    ) -> AppResult<CommandOutcome> {
        let selected = selection.resolve(&self.refresh().await?)?;

        let outcome = self.coordinator.run(kind, &selected).await;
        if let BatchOutcome::Succeeded { dispatched } = outcome {
            writeln!(output, "{}", completion_message(kind, dispatched))?;
        }
        Ok(CommandOutcome::Batch(outcome))
    }

    /// Open the gate for the selection and keep prompting until the delete
    /// batch succeeds or the user gives up. A failed batch leaves the gate
    /// open so the same selection can be confirmed again.
    async fn run_delete<R, W>(
        &mut self,
        selection: &Selection,
        input: R,
        output: W,
    ) -> AppResult<CommandOutcome>
    where
        R: BufRead,
        W: Write,
    {
        let selected = selection.resolve(&self.refresh().await?)?;

        self.gate.open(selected);
        let mut prompt = DeletePrompt::new(input, output);
        prompt.render(&self.gate)?;

        loop {
            let busy = self.coordinator.is_busy();
            let confirmed = match prompt.ask(&mut self.gate, busy)? {
                PromptOutcome::Confirmed(confirmed) => confirmed,
                PromptOutcome::Cancelled => return Ok(CommandOutcome::Cancelled),
            };

            let outcome = self.coordinator.delete_all(&confirmed).await;
            match outcome {
                BatchOutcome::Succeeded { dispatched } => {
                    self.gate.close();
                    prompt.say(&completion_message(BatchOperationKind::Delete, dispatched))?;
                    return Ok(CommandOutcome::Batch(outcome));
                }
                BatchOutcome::Failed => {
                    prompt.say("Type DELETE to retry, or end input to cancel")?;
                }
            }
        }
    }
}

fn completion_message(kind: BatchOperationKind, count: usize) -> String {
    let verb = match kind {
        BatchOperationKind::Start => "Started",
        BatchOperationKind::Stop => "Stopped",
        BatchOperationKind::Delete => "Deleted",
    };
    let noun = if count == 1 { "workspace" } else { "workspaces" };
    format!("{verb} {count} {noun}")
}

fn write_listing<W: Write>(output: &mut W, workspaces: &[Workspace]) -> AppResult<()> {
    if workspaces.is_empty() {
        writeln!(output, "No workspaces found")?;
        return Ok(());
    }

    for workspace in workspaces {
        let status = workspace
            .latest_build
            .status
            .as_deref()
            .unwrap_or("unknown");
        writeln!(
            output,
            "{}\t{}\t{}",
            workspace.id,
            workspace.display_name(),
            status
        )?;
    }
    Ok(())
}
