/*
[INPUT]:  Allowed statuses from the controller, key presses from the TUI
[OUTPUT]: CreationSubmitted events for valid title/status pairs
[POS]:    View layer - creation dialog model rendered as a modal
[UPDATE]: When dialog fields, key bindings or validation change
*/

use crossterm::event::KeyCode;
use taskview_adapter::{MAX_TITLE_CHARS, StatusSet};
use tracing::{debug, warn};

use super::{CreationDialogView, EventSink, ViewEvent};
use crate::controller::{ValidationError, validate_status, validate_title};

/// Statuses offered before the store's list arrives.
pub const FALLBACK_STATUSES: [&str; 3] = ["WAITING", "ACTIVE", "DONE"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogField {
    Title,
    Status,
    AddButton,
}

impl DialogField {
    const ORDER: [DialogField; 3] = [DialogField::Title, DialogField::Status, DialogField::AddButton];

    pub fn label(self) -> &'static str {
        match self {
            DialogField::Title => "Task",
            DialogField::Status => "Status",
            DialogField::AddButton => "Add task",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalAction {
    Submit,
    Cancel,
    None,
}

#[derive(Debug)]
pub struct CreateTaskDialog {
    title: String,
    statuses: StatusSet,
    selected_status: usize,
    focus: usize,
    open: bool,
    error: Option<ValidationError>,
    sink: Option<EventSink>,
}

impl Default for CreateTaskDialog {
    fn default() -> Self {
        Self {
            title: String::new(),
            statuses: StatusSet::new(FALLBACK_STATUSES),
            selected_status: 0,
            focus: 0,
            open: false,
            error: None,
            sink: None,
        }
    }
}

impl CreateTaskDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn statuses(&self) -> &StatusSet {
        &self.statuses
    }

    pub fn selected_status(&self) -> Option<&str> {
        self.statuses
            .as_slice()
            .get(self.selected_status)
            .map(String::as_str)
    }

    pub fn focused(&self) -> DialogField {
        DialogField::ORDER[self.focus % DialogField::ORDER.len()]
    }

    pub fn fields(&self) -> &'static [DialogField] {
        &DialogField::ORDER
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Append a character unless the title is already at its limit.
    pub fn push_char(&mut self, ch: char) {
        if self.title.chars().count() < MAX_TITLE_CHARS {
            self.title.push(ch);
        }
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.chars().take(MAX_TITLE_CHARS).collect();
    }

    pub fn select_status(&mut self, status: &str) -> bool {
        match self.statuses.position(status) {
            Some(idx) => {
                self.selected_status = idx;
                true
            }
            None => false,
        }
    }

    /// Validate and emit the new task. On failure the dialog stays open.
    pub fn submit(&mut self) -> Result<(), ValidationError> {
        let result = self.validated();
        let (title, status) = match result {
            Ok(pair) => pair,
            Err(err) => {
                debug!(error = %err, "creation input rejected");
                self.error = Some(err.clone());
                return Err(err);
            }
        };

        match &self.sink {
            Some(sink) => {
                sink.emit(ViewEvent::CreationSubmitted { title, status });
            }
            None => warn!("creation dialog has no subscriber; dropping submission"),
        }
        self.title.clear();
        self.error = None;
        self.close();
        Ok(())
    }

    fn validated(&self) -> Result<(String, String), ValidationError> {
        let title = validate_title(&self.title)?.to_string();
        let status = self
            .selected_status()
            .ok_or_else(|| ValidationError::UnknownStatus {
                status: String::new(),
            })?
            .to_string();
        validate_status(&status, &self.statuses)?;
        Ok((title, status))
    }

    pub fn handle_key(&mut self, key: KeyCode) -> ModalAction {
        match key {
            KeyCode::Esc => {
                self.close();
                ModalAction::Cancel
            }
            KeyCode::Tab => {
                self.focus = (self.focus + 1) % DialogField::ORDER.len();
                ModalAction::None
            }
            KeyCode::BackTab => {
                self.focus = (self.focus + DialogField::ORDER.len() - 1) % DialogField::ORDER.len();
                ModalAction::None
            }
            KeyCode::Up if self.focused() == DialogField::Status => {
                self.selected_status = self.selected_status.saturating_sub(1);
                ModalAction::None
            }
            KeyCode::Down if self.focused() == DialogField::Status => {
                if self.selected_status + 1 < self.statuses.len() {
                    self.selected_status += 1;
                }
                ModalAction::None
            }
            KeyCode::Backspace if self.focused() == DialogField::Title => {
                self.title.pop();
                ModalAction::None
            }
            KeyCode::Char(ch) if self.focused() == DialogField::Title => {
                self.push_char(ch);
                ModalAction::None
            }
            KeyCode::Enter if self.focused() == DialogField::AddButton => match self.submit() {
                Ok(()) => ModalAction::Submit,
                Err(_) => ModalAction::None,
            },
            _ => ModalAction::None,
        }
    }
}

impl CreationDialogView for CreateTaskDialog {
    fn open(&mut self) {
        self.open = true;
        self.focus = 0;
        self.error = None;
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn set_allowed_statuses(&mut self, statuses: &StatusSet) {
        let previous = self.selected_status().map(str::to_string);
        self.statuses = statuses.clone();
        self.selected_status = previous
            .and_then(|status| self.statuses.position(&status))
            .unwrap_or(0);
    }

    fn subscribe(&mut self, sink: EventSink) {
        self.sink = Some(sink);
    }
}
