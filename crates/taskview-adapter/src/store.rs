/*
[INPUT]:  Task store operations (list, create, set status, delete)
[OUTPUT]: TaskStore trait seam implemented by the HTTP client
[POS]:    Store seam - lets callers swap the HTTP client for another store
[UPDATE]: When the store contract gains or changes operations
*/

use async_trait::async_trait;

use crate::http::{Result, TaskStoreClient};
use crate::types::{StatusChange, StatusSet, Task, TaskId};

/// Remote task store contract.
///
/// Implementations keep no local state between calls and never panic on
/// transport or parse failures; every failure is a [`crate::StoreError`].
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_statuses(&self) -> Result<StatusSet>;

    async fn list_tasks(&self) -> Result<Vec<Task>>;

    async fn create_task(&self, title: &str, status: &str) -> Result<Task>;

    async fn set_status(&self, id: &TaskId, status: &str) -> Result<StatusChange>;

    async fn delete_task(&self, id: &TaskId) -> Result<bool>;
}

#[async_trait]
impl TaskStore for TaskStoreClient {
    async fn list_statuses(&self) -> Result<StatusSet> {
        TaskStoreClient::list_statuses(self).await
    }

    async fn list_tasks(&self) -> Result<Vec<Task>> {
        TaskStoreClient::list_tasks(self).await
    }

    async fn create_task(&self, title: &str, status: &str) -> Result<Task> {
        TaskStoreClient::create_task(self, title, status).await
    }

    async fn set_status(&self, id: &TaskId, status: &str) -> Result<StatusChange> {
        TaskStoreClient::set_status(self, id, status).await
    }

    async fn delete_task(&self, id: &TaskId) -> Result<bool> {
        TaskStoreClient::delete_task(self, id).await
    }
}
