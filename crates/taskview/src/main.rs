/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Running task board, store check report, or generated config
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

mod cli;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use taskview::config::TaskViewConfig;
use taskview::tui::{self, LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory};
use taskview::{CreateTaskDialog, SyncController, TaskTable};
use taskview_adapter::TaskStoreClient;

#[derive(Parser, Debug)]
#[command(name = "taskview", version, about = "Terminal task board for a remote task store")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    /// Overrides `service_url` from the config file
    #[arg(long = "service-url", value_name = "URL", env = "TASKVIEW_SERVICE_URL", global = true)]
    service_url: Option<String>,
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the interactive task board (default)
    Tui,
    /// Load statuses and tasks once and print them
    Check,
    /// Create a configuration file interactively
    Init {
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    match args.command.as_ref().unwrap_or(&Command::Tui) {
        Command::Init { output } => {
            let output = match output {
                Some(path) => path.clone(),
                None => TaskViewConfig::default_path()
                    .context("no config directory; pass --output")?,
            };
            cli::init::run_init(output)
        }
        Command::Check => {
            let config = load_config(&args)?;
            init_tracing(args.log_level.as_deref().unwrap_or(&config.log.level))?;
            cli::check::run_check(&config).await
        }
        Command::Tui => {
            let config = load_config(&args)?;
            let log_buffer = LogBuffer::handle(LOG_BUFFER_CAPACITY);
            let _guard = init_tui_tracing(
                args.log_level.as_deref().unwrap_or(&config.log.level),
                &config.log_file(),
                log_buffer.clone(),
            )?;
            run_board(config, log_buffer).await
        }
    }
}

async fn run_board(config: TaskViewConfig, log_buffer: LogBufferHandle) -> Result<()> {
    info!(service_url = %config.service_url, "starting taskview");
    let client = TaskStoreClient::with_config(config.client_config(), &config.service_url)
        .context("build task store client")?;
    let board = SyncController::with_options(
        Arc::new(client),
        TaskTable::new(),
        CreateTaskDialog::new(),
        config.controller_options(),
    );

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());
    tui::run_tui(board, log_buffer, shutdown).await
}

/// Explicit `--config` must exist; the default path is optional.
fn load_config(args: &Cli) -> Result<TaskViewConfig> {
    let mut config = match &args.config_path {
        Some(path) => TaskViewConfig::from_file(path).context("load config")?,
        None => match TaskViewConfig::default_path().filter(|path| path.exists()) {
            Some(path) => TaskViewConfig::from_file(&path).context("load config")?,
            None => TaskViewConfig::default(),
        },
    };
    if let Some(url) = &args.service_url {
        config.service_url = url.clone();
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn env_filter(log_level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(log_level).context("invalid log level"),
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(log_level)?)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

/// The TUI owns stdout, so logs go to a file and the in-app log pane.
fn init_tui_tracing(
    log_level: &str,
    log_file: &Path,
    log_buffer: LogBufferHandle,
) -> Result<WorkerGuard> {
    let dir = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create log directory {}", dir.display()))?;
    let file_name = log_file
        .file_name()
        .context("log file path must name a file")?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

    tracing_subscriber::registry()
        .with(env_filter(log_level)?)
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(
            fmt::layer()
                .with_writer(LogWriterFactory::new(log_buffer))
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(guard)
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
