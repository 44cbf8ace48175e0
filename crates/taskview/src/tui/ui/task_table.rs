/*
[INPUT]:  TaskTable rows, selection and selector positions
[OUTPUT]: Task table rendered into a Ratatui frame
[POS]:    TUI UI task table rendering
[UPDATE]: When table columns or row styling change
*/

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::border_style;
use crate::view::TaskTable;

const PENDING_MARKER: &str = "*";

pub(in crate::tui) fn draw_task_table(frame: &mut ratatui::Frame, area: Rect, table: &TaskTable) {
    let header = Row::new(vec![
        Cell::from("Title"),
        Cell::from("Status"),
        Cell::from("Modify"),
        Cell::from(""),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let title_width = area.width.saturating_sub(34).max(10) as usize;
    let rows: Vec<Row> = table
        .rows()
        .iter()
        .map(|row| {
            let selector = table.selector_label(row);
            let selector_style = if row.selector_index() == 0 {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Yellow)
            };
            Row::new(vec![
                Cell::from(clip(row.title(), title_width)),
                Cell::from(row.status().to_string()),
                Cell::from(format!("< {selector} >")).style(selector_style),
                Cell::from(if row.is_pending() { PENDING_MARKER } else { "" }),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(10),
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Length(2),
    ];
    let widget = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style())
                .title("Tasks"),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(table.selected_index());
    frame.render_stateful_widget(widget, area, &mut state);
}

/// Shorten `text` to `max` display columns.
fn clip(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
