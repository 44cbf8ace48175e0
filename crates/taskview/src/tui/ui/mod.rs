/*
[INPUT]:  TaskBoard state and log buffer
[OUTPUT]: Full board frame (header, table, logs, footer, modals)
[POS]:    TUI UI module root
[UPDATE]: When the board layout changes
*/

mod modal;
mod task_table;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use super::{LogBufferHandle, TaskBoard};
use crate::controller::LifecycleState;
use crate::view::CreationDialogView;

const HOTKEYS: &str = "[Up/Down] Select  [Left/Right] Status  [Enter] Apply  [d] Delete  [t] New task  [q] Quit";

pub(in crate::tui) fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

fn state_style(state: LifecycleState) -> Style {
    let color = match state {
        LifecycleState::Ready => Color::Green,
        LifecycleState::Mutating => Color::Yellow,
        LifecycleState::Degraded => Color::Red,
        LifecycleState::Uninitialized | LifecycleState::Loading => Color::DarkGray,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

pub(in crate::tui) fn draw_board(frame: &mut ratatui::Frame, board: &TaskBoard, logs: &LogBufferHandle) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(8),
            Constraint::Length(3),
        ])
        .split(area);

    draw_header(frame, layout[0], board);
    task_table::draw_task_table(frame, layout[1], board.rows());
    draw_logs(frame, layout[2], logs);
    draw_footer(frame, layout[3], board);

    if board.dialog().is_open() {
        modal::draw_dialog(frame, area, board.dialog());
    } else if let Some(confirmation) = board.rows().staged() {
        modal::draw_confirmation(frame, area, confirmation);
    }
}

fn draw_header(frame: &mut ratatui::Frame, area: Rect, board: &TaskBoard) {
    let state = board.state();
    let mut spans = vec![
        Span::styled(format!("[{state}]"), state_style(state)),
        Span::raw("  "),
        Span::raw(board.message().to_string()),
    ];
    if board.pending_count() > 0 {
        spans.push(Span::styled(
            format!("  ({} in flight)", board.pending_count()),
            Style::default().fg(Color::Yellow),
        ));
    }
    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("taskview"),
    );
    frame.render_widget(header, area);
}

fn draw_logs(frame: &mut ratatui::Frame, area: Rect, logs: &LogBufferHandle) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines = logs
        .lock()
        .map(|buffer| buffer.tail(visible))
        .unwrap_or_default();
    let items: Vec<ListItem> = lines.into_iter().map(ListItem::new).collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title("Logs"),
    );
    frame.render_widget(list, area);
}

fn draw_footer(frame: &mut ratatui::Frame, area: Rect, board: &TaskBoard) {
    let mut spans = vec![Span::raw(HOTKEYS)];
    if let Some(err) = board.last_error() {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(err.to_string(), Style::default().fg(Color::Red)));
    }
    let footer = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Hotkeys"));
    frame.render_widget(footer, area);
}
