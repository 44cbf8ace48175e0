/*
[INPUT]:  Crossterm key codes
[OUTPUT]: Row navigation, confirmations and dialog input routed to the board
[POS]:    TUI key routing
[UPDATE]: When hotkeys change
*/

use crossterm::event::KeyCode;

use super::TaskBoard;
use crate::view::CreationDialogView;

/// Handles key events for the TUI.
///
/// Returns `true` if quit is requested, `false` otherwise. Confirmed requests
/// land on the board's event queue; the caller drains it.
pub(super) fn handle_key_event(board: &mut TaskBoard, key: KeyCode) -> bool {
    if board.dialog().is_open() {
        board.dialog_mut().handle_key(key);
        return false;
    }

    if board.rows().staged().is_some() {
        match key {
            KeyCode::Char('y') | KeyCode::Enter => {
                board.rows_mut().confirm();
            }
            KeyCode::Char('n') | KeyCode::Esc => board.rows_mut().cancel_confirmation(),
            _ => {}
        }
        return false;
    }

    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Up => board.rows_mut().select_previous(),
        KeyCode::Down => board.rows_mut().select_next(),
        KeyCode::Left => board.rows_mut().cycle_selector(-1),
        KeyCode::Right => board.rows_mut().cycle_selector(1),
        KeyCode::Enter => {
            board.rows_mut().request_status_change();
        }
        KeyCode::Char('d') => {
            board.rows_mut().request_delete();
        }
        KeyCode::Char('t') => {
            board.open_dialog();
        }
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use taskview_adapter::{StatusChange, StatusSet, StoreError, Task, TaskId, TaskStore};

    use super::*;
    use crate::controller::SyncController;
    use crate::view::{CreateTaskDialog, TaskTable};

    struct FixedStore;

    #[async_trait]
    impl TaskStore for FixedStore {
        async fn list_statuses(&self) -> Result<StatusSet, StoreError> {
            Ok(StatusSet::new(["WAITING", "ACTIVE", "DONE"]))
        }

        async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
            Ok(vec![Task {
                id: TaskId::from(1),
                title: "Paint roof".to_string(),
                status: "WAITING".to_string(),
            }])
        }

        async fn create_task(&self, title: &str, status: &str) -> Result<Task, StoreError> {
            Ok(Task {
                id: TaskId::from(2),
                title: title.to_string(),
                status: status.to_string(),
            })
        }

        async fn set_status(&self, id: &TaskId, status: &str) -> Result<StatusChange, StoreError> {
            Ok(StatusChange {
                id: id.clone(),
                status: status.to_string(),
            })
        }

        async fn delete_task(&self, _id: &TaskId) -> Result<bool, StoreError> {
            Ok(true)
        }
    }

    async fn started_board() -> TaskBoard {
        let mut board =
            SyncController::new(Arc::new(FixedStore), TaskTable::new(), CreateTaskDialog::new());
        board.start().await.expect("start");
        board
    }

    #[tokio::test]
    async fn quit_only_outside_prompts() {
        let mut board = started_board().await;
        board.rows_mut().request_delete();
        assert!(!handle_key_event(&mut board, KeyCode::Char('q')));
        handle_key_event(&mut board, KeyCode::Char('n'));
        assert!(handle_key_event(&mut board, KeyCode::Char('q')));
    }

    #[tokio::test]
    async fn status_change_flows_through_confirmation() {
        let mut board = started_board().await;
        for key in [KeyCode::Right, KeyCode::Right, KeyCode::Enter] {
            handle_key_event(&mut board, key);
        }
        assert!(board.rows().staged().is_some());
        handle_key_event(&mut board, KeyCode::Char('y'));
        assert!(board.drain_view_events().is_empty());
        assert!(board.is_pending(&TaskId::from(1)));

        board.settle().await;
        assert_eq!(
            board.task(&TaskId::from(1)).map(|task| task.status.as_str()),
            Some("ACTIVE")
        );
    }

    #[tokio::test]
    async fn dialog_captures_keys_while_open() {
        let mut board = started_board().await;
        handle_key_event(&mut board, KeyCode::Char('t'));
        assert!(board.dialog().is_open());
        // 'q' is typed into the title, not treated as quit.
        assert!(!handle_key_event(&mut board, KeyCode::Char('q')));
        assert_eq!(board.dialog().title(), "q");
        handle_key_event(&mut board, KeyCode::Esc);
        assert!(!board.dialog().is_open());
    }
}
