/*
[INPUT]:  TaskStore handle, row list and creation dialog views, ViewEvents
[OUTPUT]: Canonical task collection kept in step with the store and both views
[POS]:    Controller layer - synchronization between the views and the task store
[UPDATE]: When the startup protocol, reconciliation rules or per-id policy change
*/

mod error;
mod lifecycle;
mod pending;

pub use error::{ControllerError, ErrorKind, ValidationError, validate_status, validate_title};
pub use lifecycle::{Lifecycle, LifecycleError, LifecycleEvent, LifecycleState};
pub use pending::{PendingKey, PendingLedger, PendingOp};

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use taskview_adapter::{StatusChange, StatusSet, StoreError, Task, TaskId, TaskStore};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::view::{CreationDialogView, EventSink, RowListView, ViewEvent};

pub const WAITING_MESSAGE: &str = "Waiting for server data.";
pub const LOADING_MESSAGE: &str = "Loading tasks...";
pub const EMPTY_MESSAGE: &str = "No tasks were found";

pub fn count_message(count: usize) -> String {
    if count == 0 {
        EMPTY_MESSAGE.to_string()
    } else {
        format!("Found {count} tasks")
    }
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Upper bound for a single dispatched store call.
    pub operation_timeout: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            operation_timeout: Duration::from_secs(15),
        }
    }
}

/// Result of a dispatched store call, applied on the controller's thread.
#[derive(Debug)]
pub enum Completion {
    Created {
        key: PendingKey,
        result: Result<Task, StoreError>,
    },
    StatusChanged {
        id: TaskId,
        result: Result<StatusChange, StoreError>,
    },
    Deleted {
        id: TaskId,
        result: Result<bool, StoreError>,
    },
}

pub struct SyncController<L, D> {
    store: Arc<dyn TaskStore>,
    rows: L,
    dialog: D,
    lifecycle: Lifecycle,
    statuses: StatusSet,
    /// Display order, newest first.
    tasks: IndexMap<TaskId, Task>,
    pending: PendingLedger,
    message: String,
    creation_enabled: bool,
    last_error: Option<String>,
    sink: EventSink,
    events_rx: mpsc::UnboundedReceiver<ViewEvent>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    options: ControllerOptions,
}

impl<L, D> SyncController<L, D>
where
    L: RowListView,
    D: CreationDialogView,
{
    pub fn new(store: Arc<dyn TaskStore>, rows: L, dialog: D) -> Self {
        Self::with_options(store, rows, dialog, ControllerOptions::default())
    }

    pub fn with_options(
        store: Arc<dyn TaskStore>,
        rows: L,
        dialog: D,
        options: ControllerOptions,
    ) -> Self {
        let (sink, events_rx) = EventSink::channel();
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            store,
            rows,
            dialog,
            lifecycle: Lifecycle::default(),
            statuses: StatusSet::default(),
            tasks: IndexMap::new(),
            pending: PendingLedger::default(),
            message: WAITING_MESSAGE.to_string(),
            creation_enabled: false,
            last_error: None,
            sink,
            events_rx,
            completions_tx,
            completions_rx,
            options,
        }
    }

    // ----- inspection -----

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn creation_enabled(&self) -> bool {
        self.creation_enabled
    }

    pub fn statuses(&self) -> &StatusSet {
        &self.statuses
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn is_pending(&self, id: &TaskId) -> bool {
        self.pending.contains_task(id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn rows(&self) -> &L {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut L {
        &mut self.rows
    }

    pub fn dialog(&self) -> &D {
        &self.dialog
    }

    pub fn dialog_mut(&mut self) -> &mut D {
        &mut self.dialog
    }

    /// Open the creation dialog. Does nothing until statuses are loaded.
    pub fn open_dialog(&mut self) -> bool {
        if self.creation_enabled {
            self.dialog.open();
        }
        self.creation_enabled
    }

    // ----- startup -----

    /// Load statuses and tasks, render them, then start listening to the views.
    ///
    /// A status failure leaves the controller `Degraded` and returns the error.
    /// A task-list failure is surfaced but the controller still becomes ready.
    pub async fn start(&mut self) -> Result<(), ControllerError> {
        if let Err(err) = self.lifecycle.transition(LifecycleEvent::Start) {
            warn!(error = %err, "start called twice");
            return Err(self.surface(ControllerError::NotReady {
                state: self.state(),
            }));
        }
        self.message = LOADING_MESSAGE.to_string();
        info!("loading statuses");

        let statuses = match self.call(self.store.list_statuses()).await {
            Ok(statuses) => statuses,
            Err(source) => {
                self.advance(LifecycleEvent::StatusesFailed);
                self.message = EMPTY_MESSAGE.to_string();
                return Err(self.surface(ControllerError::store("list_statuses", source)));
            }
        };
        self.rows.set_allowed_statuses(&statuses);
        self.dialog.set_allowed_statuses(&statuses);
        self.statuses = statuses;

        match self.call(self.store.list_tasks()).await {
            Ok(tasks) => {
                info!(count = tasks.len(), "tasks loaded");
                for task in tasks {
                    self.insert_task(task);
                }
            }
            Err(source) => {
                self.surface(ControllerError::store("list_tasks", source));
            }
        }
        self.refresh_message();

        self.rows.subscribe(self.sink.clone());
        self.dialog.subscribe(self.sink.clone());
        self.creation_enabled = true;
        self.advance(LifecycleEvent::StatusesLoaded);
        Ok(())
    }

    // ----- view events -----

    /// Run local guards, then dispatch the store call in the background.
    pub fn handle_event(&mut self, event: ViewEvent) -> Result<(), ControllerError> {
        debug!(?event, state = %self.state(), "handling view event");
        let result = match event {
            ViewEvent::CreationSubmitted { title, status } => self.dispatch_create(&title, status),
            ViewEvent::StatusChangeRequested { id, status } => {
                let result = self.dispatch_status(&id, status);
                if result.is_err() {
                    self.revert_row(&id);
                }
                result
            }
            ViewEvent::DeleteRequested { id } => self.dispatch_delete(id),
        };
        result.map_err(|err| self.surface(err))
    }

    /// Handle every view event queued so far.
    pub fn drain_view_events(&mut self) -> Vec<ControllerError> {
        let mut errors = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            if let Err(err) = self.handle_event(event) {
                errors.push(err);
            }
        }
        errors
    }

    fn ensure_ready(&self) -> Result<(), ControllerError> {
        let state = self.state();
        if state.accepts_mutations() {
            Ok(())
        } else {
            Err(ControllerError::NotReady { state })
        }
    }

    fn ensure_idle(&self, id: &TaskId) -> Result<&Task, ControllerError> {
        let task = self
            .tasks
            .get(id)
            .ok_or_else(|| ControllerError::UnknownTask { id: id.clone() })?;
        if self.pending.contains_task(id) {
            return Err(ControllerError::ConcurrencyConflict { id: id.clone() });
        }
        Ok(task)
    }

    fn dispatch_create(&mut self, title: &str, status: String) -> Result<(), ControllerError> {
        self.ensure_ready()?;
        let title = validate_title(title)?.to_string();
        validate_status(&status, &self.statuses)?;

        let key = PendingKey::fresh_create();
        self.pending.try_claim(key.clone(), PendingOp::Create);
        info!(%title, %status, "creating task");

        let store = Arc::clone(&self.store);
        self.spawn(
            async move { store.create_task(&title, &status).await },
            move |result| Completion::Created { key, result },
        );
        Ok(())
    }

    fn dispatch_status(&mut self, id: &TaskId, status: String) -> Result<(), ControllerError> {
        self.ensure_ready()?;
        validate_status(&status, &self.statuses)?;
        let previous = self.ensure_idle(id)?.status.clone();

        let op = PendingOp::SetStatus { previous };
        if !self.pending.try_claim(PendingKey::Task(id.clone()), op) {
            return Err(ControllerError::ConcurrencyConflict { id: id.clone() });
        }
        self.rows.set_row_pending(id, true);
        info!(%id, %status, "changing task status");

        let store = Arc::clone(&self.store);
        let task_id = id.clone();
        self.spawn(
            async move { store.set_status(&task_id, &status).await },
            {
                let id = id.clone();
                move |result| Completion::StatusChanged { id, result }
            },
        );
        Ok(())
    }

    fn dispatch_delete(&mut self, id: TaskId) -> Result<(), ControllerError> {
        self.ensure_ready()?;
        self.ensure_idle(&id)?;

        if !self
            .pending
            .try_claim(PendingKey::Task(id.clone()), PendingOp::Delete)
        {
            return Err(ControllerError::ConcurrencyConflict { id });
        }
        self.rows.set_row_pending(&id, true);
        info!(%id, "deleting task");

        let store = Arc::clone(&self.store);
        let task_id = id.clone();
        self.spawn(
            async move { store.delete_task(&task_id).await },
            move |result| Completion::Deleted { id, result },
        );
        Ok(())
    }

    /// Run a store call on the runtime and post its completion back.
    fn spawn<F, T, W>(&mut self, call: F, wrap: W)
    where
        F: Future<Output = Result<T, StoreError>> + Send + 'static,
        T: Send + 'static,
        W: FnOnce(Result<T, StoreError>) -> Completion + Send + 'static,
    {
        let limit = self.options.operation_timeout;
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let result = with_timeout(limit, call).await;
            if tx.send(wrap(result)).is_err() {
                debug!("controller dropped before completion arrived");
            }
        });
        self.advance(LifecycleEvent::OperationDispatched);
    }

    // ----- completions -----

    /// Reconcile the collection and views with one finished store call.
    pub fn apply_completion(&mut self, completion: Completion) -> Result<(), ControllerError> {
        let result = match completion {
            Completion::Created { key, result } => {
                self.pending.release(&key);
                match result {
                    Ok(task) => {
                        info!(id = %task.id, "task created");
                        self.insert_task(task);
                        self.refresh_message();
                        Ok(())
                    }
                    Err(source) => Err(ControllerError::store("create_task", source)),
                }
            }
            Completion::StatusChanged { id, result } => {
                let released = self.pending.release(&PendingKey::Task(id.clone()));
                self.rows.set_row_pending(&id, false);
                match result {
                    Ok(change) => {
                        if let Some(task) = self.tasks.get_mut(&id) {
                            task.status = change.status;
                            self.rows.update_row_status(&id, &task.status);
                            info!(%id, status = %task.status, "task status changed");
                        }
                        Ok(())
                    }
                    Err(source) => {
                        match released {
                            Some(PendingOp::SetStatus { previous }) => {
                                debug!(%id, %previous, "restoring status after failed change");
                                self.rows.update_row_status(&id, &previous);
                            }
                            _ => self.revert_row(&id),
                        }
                        Err(ControllerError::store("set_status", source))
                    }
                }
            }
            Completion::Deleted { id, result } => {
                self.pending.release(&PendingKey::Task(id.clone()));
                self.rows.set_row_pending(&id, false);
                match result {
                    Ok(true) => {
                        self.tasks.shift_remove(&id);
                        self.rows.remove_row(&id);
                        self.refresh_message();
                        info!(%id, "task deleted");
                        Ok(())
                    }
                    Ok(false) => Err(ControllerError::store(
                        "delete_task",
                        StoreError::Rejected {
                            operation: "delete_task",
                        },
                    )),
                    Err(source) => Err(ControllerError::store("delete_task", source)),
                }
            }
        };

        if self.pending.is_empty() && self.state() == LifecycleState::Mutating {
            self.advance(LifecycleEvent::AllSettled);
        }
        result.map_err(|err| self.surface(err))
    }

    /// Wait for and apply one completion. `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Result<(), ControllerError>> {
        if self.pending.is_empty() {
            return None;
        }
        let completion = self.completions_rx.recv().await?;
        Some(self.apply_completion(completion))
    }

    /// Apply completions until nothing is in flight; returns the failures.
    pub async fn settle(&mut self) -> Vec<ControllerError> {
        let mut errors = Vec::new();
        while let Some(result) = self.next_completion().await {
            if let Err(err) = result {
                errors.push(err);
            }
        }
        errors
    }

    /// Process the next view event or completion, whichever arrives first.
    pub async fn step(&mut self) -> Result<(), ControllerError> {
        tokio::select! {
            Some(event) = self.events_rx.recv() => self.handle_event(event),
            Some(completion) = self.completions_rx.recv() => self.apply_completion(completion),
        }
    }

    pub async fn run(&mut self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("controller shutting down");
                    break;
                }
                // Failures are already logged and kept in last_error.
                _ = self.step() => {}
            }
        }
    }

    // ----- helpers -----

    fn insert_task(&mut self, task: Task) {
        self.rows.add_row(&task);
        if let Some(existing) = self.tasks.get_mut(&task.id) {
            *existing = task;
        } else {
            self.tasks.shift_insert(0, task.id.clone(), task);
        }
    }

    /// Put the row back on its last confirmed status.
    fn revert_row(&mut self, id: &TaskId) {
        if let Some(task) = self.tasks.get(id) {
            self.rows.update_row_status(id, &task.status);
        }
    }

    fn refresh_message(&mut self) {
        self.message = count_message(self.rows.row_count());
    }

    fn advance(&mut self, event: LifecycleEvent) {
        match self.lifecycle.transition(event) {
            Ok(state) => debug!(?event, %state, "lifecycle transition"),
            Err(err) => warn!(error = %err, "lifecycle transition ignored"),
        }
    }

    fn surface(&mut self, err: ControllerError) -> ControllerError {
        warn!(error = %err, kind = ?err.kind(), "controller error");
        self.last_error = Some(err.to_string());
        err
    }

    async fn call<T>(
        &self,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        with_timeout(self.options.operation_timeout, fut).await
    }
}

async fn with_timeout<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, StoreError>>,
) -> Result<T, StoreError> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout {
            duration: limit.as_secs(),
        }),
    }
}
