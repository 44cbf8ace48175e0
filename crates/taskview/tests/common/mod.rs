/*
[INPUT]:  Test scenarios for the synchronization controller
[OUTPUT]: Scripted in-memory TaskStore with failure switches and call gates
[POS]:    Integration test support
[UPDATE]: When the TaskStore contract changes
*/

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use taskview::{CreateTaskDialog, SyncController, TaskBoard, TaskTable};
use taskview::controller::ControllerOptions;
use taskview_adapter::{StatusChange, StatusSet, StoreError, Task, TaskId, TaskStore};
use tokio::sync::Semaphore;

pub const STATUSES: [&str; 3] = ["WAITING", "ACTIVE", "DONE"];

pub fn task(id: i64, title: &str, status: &str) -> Task {
    Task {
        id: TaskId::from(id),
        title: title.to_string(),
        status: status.to_string(),
    }
}

/// Lets held calls through one permit at a time; releases made before a
/// call arrives are kept.
#[derive(Clone)]
pub struct Gate {
    permits: Arc<Semaphore>,
}

impl Default for Gate {
    fn default() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(0)),
        }
    }
}

impl Gate {
    pub fn release(&self, calls: usize) {
        self.permits.add_permits(calls);
    }

    async fn pass(&self) {
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
    }
}

#[derive(Default)]
struct Script {
    failing: HashSet<&'static str>,
    gates: HashMap<&'static str, Gate>,
}

pub struct ScriptedStore {
    statuses: Option<Vec<String>>,
    tasks: Option<Vec<Task>>,
    next_id: AtomicI64,
    script: Mutex<Script>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            statuses: Some(STATUSES.iter().map(|s| s.to_string()).collect()),
            tasks: Some(tasks),
            next_id: AtomicI64::new(100),
            script: Mutex::new(Script::default()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn without_statuses(mut self) -> Self {
        self.statuses = None;
        self
    }

    pub fn without_task_list(mut self) -> Self {
        self.tasks = None;
        self
    }

    pub fn next_id(self, id: i64) -> Self {
        self.next_id.store(id, Ordering::SeqCst);
        self
    }

    /// Make every later call of `operation` fail with a rejection.
    pub fn fail(&self, operation: &'static str) {
        self.script.lock().unwrap().failing.insert(operation);
    }

    /// Hold calls of `operation` until released through the returned gate.
    pub fn hold(&self, operation: &'static str) -> Gate {
        let gate = Gate::default();
        self.script
            .lock()
            .unwrap()
            .gates
            .insert(operation, gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.split(' ').next() == Some(operation))
            .count()
    }

    async fn enter(&self, operation: &'static str, call: String) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(call);
        let (gate, failing) = {
            let script = self.script.lock().unwrap();
            (
                script.gates.get(operation).cloned(),
                script.failing.contains(operation),
            )
        };
        if let Some(gate) = gate {
            gate.pass().await;
        }
        if failing {
            Err(StoreError::Rejected { operation })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TaskStore for ScriptedStore {
    async fn list_statuses(&self) -> Result<StatusSet, StoreError> {
        self.enter("list_statuses", "list_statuses".to_string()).await?;
        self.statuses
            .clone()
            .map(StatusSet::new)
            .ok_or(StoreError::Rejected {
                operation: "list_statuses",
            })
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        self.enter("list_tasks", "list_tasks".to_string()).await?;
        self.tasks.clone().ok_or(StoreError::Rejected {
            operation: "list_tasks",
        })
    }

    async fn create_task(&self, title: &str, status: &str) -> Result<Task, StoreError> {
        self.enter("create_task", format!("create_task {title} {status}"))
            .await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(task(id, title, status))
    }

    async fn set_status(&self, id: &TaskId, status: &str) -> Result<StatusChange, StoreError> {
        self.enter("set_status", format!("set_status {id} {status}"))
            .await?;
        Ok(StatusChange {
            id: id.clone(),
            status: status.to_string(),
        })
    }

    async fn delete_task(&self, id: &TaskId) -> Result<bool, StoreError> {
        self.enter("delete_task", format!("delete_task {id}")).await?;
        Ok(true)
    }
}

pub fn board(store: Arc<ScriptedStore>) -> TaskBoard {
    SyncController::new(store, TaskTable::new(), CreateTaskDialog::new())
}

pub fn board_with_options(store: Arc<ScriptedStore>, options: ControllerOptions) -> TaskBoard {
    SyncController::with_options(store, TaskTable::new(), CreateTaskDialog::new(), options)
}

pub async fn started_board(tasks: Vec<Task>) -> (TaskBoard, Arc<ScriptedStore>) {
    let store = Arc::new(ScriptedStore::new(tasks));
    let mut board = board(store.clone());
    board.start().await.expect("startup");
    (board, store)
}

/// Ids in display order.
pub fn row_ids(board: &TaskBoard) -> Vec<String> {
    board
        .rows()
        .rows()
        .iter()
        .map(|row| row.id().to_string())
        .collect()
}
