/*
[INPUT]:  Validated TaskViewConfig
[OUTPUT]: One-shot startup against the store, printed rows and message
[POS]:    CLI check command
[UPDATE]: When the startup report format changes
*/

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use console::style;
use tracing::{info, warn};

use taskview::config::TaskViewConfig;
use taskview::controller::LifecycleState;
use taskview::{CreateTaskDialog, SyncController, TaskTable};
use taskview_adapter::TaskStoreClient;

pub async fn run_check(config: &TaskViewConfig) -> Result<()> {
    let client = TaskStoreClient::with_config(config.client_config(), &config.service_url)
        .context("build task store client")?;
    info!(service_url = %client.base_url(), "checking task store");

    let mut board = SyncController::with_options(
        Arc::new(client),
        TaskTable::new(),
        CreateTaskDialog::new(),
        config.controller_options(),
    );
    if let Err(err) = board.start().await {
        warn!(error = %err, "startup failed");
    }

    println!(
        "{} {}",
        style(format!("[{}]", board.state())).bold(),
        style(board.message()).cyan()
    );
    if !board.statuses().is_empty() {
        let labels: Vec<&str> = board.statuses().iter().collect();
        println!("{} {}", style("Statuses:").dim(), labels.join(", "));
    }
    for row in board.rows().rows() {
        println!(
            "  {:>6}  {:<12} {}",
            style(row.id()).dim(),
            style(row.status()).yellow(),
            row.title()
        );
    }
    if let Some(err) = board.last_error() {
        println!("{} {}", style("Error:").red().bold(), err);
    }

    if board.state() == LifecycleState::Degraded {
        bail!("task store unavailable");
    }
    Ok(())
}
