/*
[INPUT]:  Confirmed tasks and status updates from the controller, row navigation from the TUI
[OUTPUT]: Newest-first row model, staged confirmations, ViewEvents for status change/delete
[POS]:    View layer - row list view model rendered by the task table widget
[UPDATE]: When row layout, selection, or confirmation flow changes
*/

use taskview_adapter::{StatusSet, Task, TaskId};
use tracing::warn;

use super::{EventSink, RowListView, ViewEvent};

/// Neutral first entry of every row's status selector.
pub const MODIFY_OPTION: &str = "<Modify>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    id: TaskId,
    title: String,
    status: String,
    selector: usize,
    pending: bool,
}

impl TaskRow {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            status: task.status.clone(),
            selector: 0,
            pending: false,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Last status confirmed by the controller.
    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn selector_index(&self) -> usize {
        self.selector
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Action waiting for the user's yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    StatusChange { id: TaskId, status: String },
    Delete { id: TaskId },
}

impl Confirmation {
    pub fn prompt(&self) -> String {
        match self {
            Confirmation::StatusChange { id, status } => format!("Set '{id}' to {status}?"),
            Confirmation::Delete { id } => format!("Are you sure you want to delete task {id}?"),
        }
    }

    fn id(&self) -> &TaskId {
        match self {
            Confirmation::StatusChange { id, .. } | Confirmation::Delete { id } => id,
        }
    }

    fn into_event(self) -> ViewEvent {
        match self {
            Confirmation::StatusChange { id, status } => {
                ViewEvent::StatusChangeRequested { id, status }
            }
            Confirmation::Delete { id } => ViewEvent::DeleteRequested { id },
        }
    }
}

#[derive(Debug, Default)]
pub struct TaskTable {
    rows: Vec<TaskRow>,
    statuses: StatusSet,
    selected: Option<usize>,
    staged: Option<Confirmation>,
    sink: Option<EventSink>,
}

impl TaskTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    pub fn row(&self, id: &TaskId) -> Option<&TaskRow> {
        self.rows.iter().find(|row| &row.id == id)
    }

    /// Selector entries shared by every row: `<Modify>` then the allowed statuses.
    pub fn selector_options(&self) -> Vec<&str> {
        std::iter::once(MODIFY_OPTION)
            .chain(self.statuses.iter())
            .collect()
    }

    pub fn selector_label(&self, row: &TaskRow) -> &str {
        if row.selector == 0 {
            return MODIFY_OPTION;
        }
        self.statuses
            .as_slice()
            .get(row.selector - 1)
            .map(String::as_str)
            .unwrap_or(MODIFY_OPTION)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_id(&self) -> Option<&TaskId> {
        self.selected
            .and_then(|idx| self.rows.get(idx))
            .map(|row| &row.id)
    }

    pub fn select_next(&mut self) {
        self.move_selection(1);
    }

    pub fn select_previous(&mut self) {
        self.move_selection(-1);
    }

    fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.selected = None;
            return;
        }
        let current = self.selected.unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, (self.rows.len() - 1) as isize) as usize;
        self.selected = Some(next);
    }

    /// Move the highlighted row's selector, wrapping around `<Modify>`.
    pub fn cycle_selector(&mut self, delta: isize) {
        let options = self.statuses.len() as isize + 1;
        let Some(row) = self.selected.and_then(|idx| self.rows.get_mut(idx)) else {
            return;
        };
        row.selector = (row.selector as isize + delta).rem_euclid(options) as usize;
    }

    pub fn staged(&self) -> Option<&Confirmation> {
        self.staged.as_ref()
    }

    /// Stage a status change for the highlighted row from its selector.
    ///
    /// Nothing is staged while the selector is on `<Modify>` or on the status
    /// the row already has.
    pub fn request_status_change(&mut self) -> Option<&Confirmation> {
        let row = self.selected.and_then(|idx| self.rows.get(idx))?;
        if row.selector == 0 {
            return None;
        }
        let status = self.statuses.as_slice().get(row.selector - 1)?;
        if status == &row.status {
            return None;
        }
        self.staged = Some(Confirmation::StatusChange {
            id: row.id.clone(),
            status: status.clone(),
        });
        self.staged.as_ref()
    }

    pub fn request_delete(&mut self) -> Option<&Confirmation> {
        let id = self.selected_id()?.clone();
        self.staged = Some(Confirmation::Delete { id });
        self.staged.as_ref()
    }

    /// Emit the staged request. Returns `true` when an event was delivered.
    pub fn confirm(&mut self) -> bool {
        let Some(staged) = self.staged.take() else {
            return false;
        };
        match &self.sink {
            Some(sink) => sink.emit(staged.into_event()),
            None => {
                warn!("row list has no subscriber; dropping confirmed request");
                false
            }
        }
    }

    pub fn cancel_confirmation(&mut self) {
        if let Some(staged) = self.staged.take() {
            let id = staged.id().clone();
            if let Some(row) = self.rows.iter_mut().find(|row| row.id == id) {
                row.selector = 0;
            }
        }
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.rows.iter().position(|row| &row.id == id)
    }
}

impl RowListView for TaskTable {
    fn set_allowed_statuses(&mut self, statuses: &StatusSet) {
        self.statuses = statuses.clone();
        for row in &mut self.rows {
            row.selector = 0;
        }
    }

    fn add_row(&mut self, task: &Task) {
        if let Some(idx) = self.position(&task.id) {
            self.rows[idx] = TaskRow::from_task(task);
            return;
        }
        self.rows.insert(0, TaskRow::from_task(task));
        // A cursor on the top row stays on top; any other keeps its row.
        self.selected = match self.selected {
            None | Some(0) => Some(0),
            Some(idx) => Some(idx + 1),
        };
    }

    fn update_row_status(&mut self, id: &TaskId, status: &str) {
        if let Some(row) = self.rows.iter_mut().find(|row| &row.id == id) {
            row.status = status.to_string();
            row.selector = 0;
        }
    }

    fn remove_row(&mut self, id: &TaskId) {
        let Some(idx) = self.position(id) else {
            return;
        };
        self.rows.remove(idx);
        if self.staged.as_ref().is_some_and(|staged| staged.id() == id) {
            self.staged = None;
        }
        self.selected = match self.selected {
            _ if self.rows.is_empty() => None,
            Some(selected) if selected > idx => Some(selected - 1),
            Some(selected) => Some(selected.min(self.rows.len() - 1)),
            None => None,
        };
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn set_row_pending(&mut self, id: &TaskId, pending: bool) {
        if let Some(row) = self.rows.iter_mut().find(|row| &row.id == id) {
            row.pending = pending;
        }
    }

    fn subscribe(&mut self, sink: EventSink) {
        self.sink = Some(sink);
    }
}
