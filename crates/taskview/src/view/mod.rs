/*
[INPUT]:  Task rows, allowed statuses and user intents from the views
[OUTPUT]: View contracts (RowListView, CreationDialogView) and ViewEvent messages
[POS]:    View layer - seams between the controller and its two view leaves
[UPDATE]: When a view contract gains operations or a new user intent is added
*/

pub mod dialog;
pub mod row_list;

pub use dialog::CreateTaskDialog;
pub use row_list::{Confirmation, TaskTable};

use taskview_adapter::{StatusSet, Task, TaskId};
use tokio::sync::mpsc;
use tracing::debug;

/// User intents raised by the views. The controller is the only subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    CreationSubmitted { title: String, status: String },
    StatusChangeRequested { id: TaskId, status: String },
    DeleteRequested { id: TaskId },
}

/// Subscription point handed to a view.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<ViewEvent>,
}

impl EventSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ViewEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Deliver an event; returns `false` when the subscriber is gone.
    pub fn emit(&self, event: ViewEvent) -> bool {
        debug!(?event, "view event");
        self.tx.send(event).is_ok()
    }
}

/// Ordered collection of task rows.
///
/// Rows change only when the controller calls in; the view never assumes a
/// requested change succeeded. Unknown ids are ignored.
pub trait RowListView {
    fn set_allowed_statuses(&mut self, statuses: &StatusSet);

    /// Render a task at the top of the list.
    fn add_row(&mut self, task: &Task);

    fn update_row_status(&mut self, id: &TaskId, status: &str);

    fn remove_row(&mut self, id: &TaskId);

    fn row_count(&self) -> usize;

    fn set_row_pending(&mut self, id: &TaskId, pending: bool);

    fn subscribe(&mut self, sink: EventSink);
}

/// Modal input for a new task's title and status.
pub trait CreationDialogView {
    fn open(&mut self);

    fn close(&mut self);

    fn is_open(&self) -> bool;

    fn set_allowed_statuses(&mut self, statuses: &StatusSet);

    fn subscribe(&mut self, sink: EventSink);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_reports_closed_subscriber() {
        let (sink, rx) = EventSink::channel();
        assert!(sink.emit(ViewEvent::DeleteRequested { id: TaskId::from(1) }));
        drop(rx);
        assert!(!sink.emit(ViewEvent::DeleteRequested { id: TaskId::from(1) }));
    }
}
