use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use server::workspace_api::WorkspaceApiClient;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use wsctl::app::{App, Command, Selection};
use wsctl::config::{ConfigLoadResult, LoggingConfig, load_config};
use wsctl::error::{AppError, ErrorContext, ErrorReporter};
use wsctl::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "wsctl", version, about = "Start, stop and delete workspaces in bulk")]
struct Cli {
    /// Path to a configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Deployment URL, overriding configuration
    #[arg(long, global = true)]
    url: Option<String>,

    /// Session token, overriding configuration
    #[arg(long, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// List workspaces
    List {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start the selected workspaces
    Start(Targets),
    /// Stop the selected workspaces
    Stop(Targets),
    /// Delete the selected workspaces after typing DELETE to confirm
    Delete(Targets),
}

#[derive(Args, Debug)]
struct Targets {
    /// Workspace ids, names or owner/name paths
    workspaces: Vec<String>,

    /// Apply to every listed workspace
    #[arg(long)]
    all: bool,
}

impl Targets {
    fn into_selection(self) -> wsctl::error::AppResult<Selection> {
        Selection::from_args(self.all, self.workspaces)
    }
}

impl CliCommand {
    fn into_command(self) -> wsctl::error::AppResult<Command> {
        Ok(match self {
            CliCommand::List { json } => Command::List { json },
            CliCommand::Start(targets) => Command::Start(targets.into_selection()?),
            CliCommand::Stop(targets) => Command::Stop(targets.into_selection()?),
            CliCommand::Delete(targets) => Command::Delete(targets.into_selection()?),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let reporter = ErrorReporter::stderr();

    let mut app_config = match load_config(cli.config.as_deref()) {
        ConfigLoadResult::Success(config) => *config,
        ConfigLoadResult::LoadError(e) | ConfigLoadResult::DeserializeError(e) => {
            setup_logger(&LoggingConfig::default()).context("Failed to initialize logger")?;
            let context = ErrorContext::new("Config", "load")
                .with_message(&e)
                .with_suggestion("Check config.toml and any WSCTL__ environment variables.");
            reporter.report(&AppError::Config(e), context);
            return Ok(ExitCode::FAILURE);
        }
    };
    app_config.apply_overrides(cli.url, cli.token);

    setup_logger(app_config.logging()).context("Failed to initialize logger")?;
    log::info!("Starting wsctl");
    match app_config.source() {
        Some(path) => log::info!("Loaded configuration from {}", path.display()),
        None => log::info!("No configuration file found, using environment and flags"),
    }

    if let Err(errors) = app_config.validate() {
        reporter.report_config_errors(&errors);
        return Ok(ExitCode::FAILURE);
    }

    let command = match cli.command.into_command() {
        Ok(command) => command,
        Err(e) => {
            reporter.report_simple(&e, "Cli", "parse_selection");
            return Ok(ExitCode::FAILURE);
        }
    };

    let coder = app_config.coder();
    let client = Arc::new(
        WorkspaceApiClient::new(
            coder.url().unwrap_or_default(),
            coder.session_token().unwrap_or_default(),
            coder.request_timeout(),
        )
        .context("Failed to create workspace API client")?,
    );

    let mut app = App::new(
        client.clone(),
        client,
        Arc::new(reporter.clone()),
        app_config.workspace_filter().map(str::to_string),
    );

    let stdin = std::io::stdin();
    let result = app
        .run(command, stdin.lock(), std::io::stdout().lock())
        .await;

    match result {
        Ok(outcome) if outcome.is_success() => Ok(ExitCode::SUCCESS),
        Ok(_) => Ok(ExitCode::FAILURE),
        Err(e) => {
            reporter.report_simple(&e, "App", "run");
            Ok(ExitCode::FAILURE)
        }
    }
}
