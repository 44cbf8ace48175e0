/*
[INPUT]:  TaskBoard (controller + terminal views), log buffer, shutdown token
[OUTPUT]: Ratatui task board driven by keys, view events and store completions
[POS]:    TUI module for the taskview binary
[UPDATE]: When changing the event loop, layout entry point or test hooks
*/

mod events;
mod log_buffer;
mod terminal;
mod ui;

pub use log_buffer::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory};

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyEventKind};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::controller::SyncController;
use crate::view::{CreateTaskDialog, TaskTable};
use terminal::Screen;

/// Controller wired to the terminal views.
pub type TaskBoard = SyncController<TaskTable, CreateTaskDialog>;

const UI_TICK_INTERVAL: Duration = Duration::from_millis(250);
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);
pub const TEST_EXIT_AFTER_TICKS_ENV: &str = "TASKVIEW_TUI_TEST_EXIT_AFTER_TICKS";

fn test_exit_after_ticks() -> Option<u64> {
    std::env::var(TEST_EXIT_AFTER_TICKS_ENV)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
}

pub async fn run_tui(
    mut board: TaskBoard,
    log_buffer: LogBufferHandle,
    shutdown: CancellationToken,
) -> Result<()> {
    let exit_after = test_exit_after_ticks();
    let mut screen = match exit_after {
        Some(_) => Screen::headless(100, 30)?,
        None => Screen::live()?,
    };

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<CrosstermEvent>();
    let input_shutdown = CancellationToken::new();
    if screen.is_live() {
        let input_shutdown = input_shutdown.clone();
        tokio::task::spawn_blocking(move || {
            while !input_shutdown.is_cancelled() {
                if crossterm::event::poll(INPUT_POLL_INTERVAL).unwrap_or(false) {
                    if let Ok(event) = crossterm::event::read() {
                        if input_tx.send(event).is_err() {
                            break;
                        }
                    }
                }
            }
        });
    } else {
        drop(input_tx);
    }

    screen.draw(|frame| ui::draw_board(frame, &board, &log_buffer))?;
    if let Err(err) = board.start().await {
        warn!(error = %err, "startup failed; board is degraded");
    }

    let mut tick = tokio::time::interval(UI_TICK_INTERVAL);
    let mut ticks: u64 = 0;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("shutdown requested");
                break;
            }
            _ = tick.tick() => {
                ticks += 1;
                if exit_after.is_some_and(|limit| ticks > limit) {
                    debug!(ticks, "test tick limit reached");
                    break;
                }
            }
            Some(event) = input_rx.recv() => {
                if let CrosstermEvent::Key(key) = event {
                    if key.kind == KeyEventKind::Press {
                        if events::handle_key_event(&mut board, key.code) {
                            break;
                        }
                        board.drain_view_events();
                    }
                }
            }
            _ = board.step() => {}
        }

        screen.draw(|frame| ui::draw_board(frame, &board, &log_buffer))?;
    }

    input_shutdown.cancel();
    info!(pending = board.pending_count(), "task board closed");
    Ok(())
}
