/*
[INPUT]:  CreateTaskDialog state and staged row confirmations
[OUTPUT]: Creation modal and yes/no prompt rendered over the board
[POS]:    TUI UI modal rendering
[UPDATE]: When dialog fields or prompt layout change
*/

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::view::dialog::DialogField;
use crate::view::{Confirmation, CreateTaskDialog};

pub(in crate::tui) fn draw_dialog(frame: &mut ratatui::Frame, area: Rect, dialog: &CreateTaskDialog) {
    let area = centered_rect(60, 9, area);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Add task  [Tab] next  [Esc] close");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = dialog
        .fields()
        .iter()
        .map(|field| {
            let content = match field {
                DialogField::Title => format!("{}: {}", field.label(), dialog.title()),
                DialogField::Status => format!(
                    "{}: {}",
                    field.label(),
                    dialog.selected_status().unwrap_or("-")
                ),
                DialogField::AddButton => format!("[{}]", field.label()),
            };
            let style = if *field == dialog.focused() {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(content, style))
        })
        .collect();

    if let Some(err) = dialog.error() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

pub(in crate::tui) fn draw_confirmation(
    frame: &mut ratatui::Frame,
    area: Rect,
    confirmation: &Confirmation,
) {
    let area = centered_rect(50, 5, area);
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(confirmation.prompt()),
        Line::from(Span::styled(
            "[y] Yes  [n] No",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Confirm"));
    frame.render_widget(paragraph, area);
}

/// Rect of `percent_x` width and `height` rows centred in `area`.
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
