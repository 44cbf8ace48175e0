/*
[INPUT]:  Task titles, statuses and ids
[OUTPUT]: Status list, task list, created tasks, status changes and delete acks
[POS]:    HTTP layer - task store endpoints
[UPDATE]: When adding new endpoints or changing response format
*/

use reqwest::Method;

use crate::http::{Result, StoreError, TaskStoreClient};
use crate::types::{
    AckResponse, CreateTaskRequest, StatusChange, StatusListResponse, StatusSet, Task, TaskId,
    TaskListResponse, TaskResponse, UpdateStatusRequest,
};

impl TaskStoreClient {
    /// List allowed statuses
    ///
    /// GET {base}/allstatuses
    pub async fn list_statuses(&self) -> Result<StatusSet> {
        let builder = self.request(Method::GET, "allstatuses")?;
        let response: StatusListResponse = self.send_envelope(builder, "list_statuses").await?;
        response
            .allstatuses
            .ok_or_else(|| StoreError::InvalidResponse("missing allstatuses".to_string()))
    }

    /// List all tasks
    ///
    /// GET {base}/tasklist
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let builder = self.request(Method::GET, "tasklist")?;
        let response: TaskListResponse = self.send_envelope(builder, "list_tasks").await?;
        response
            .tasks
            .ok_or_else(|| StoreError::InvalidResponse("missing tasks".to_string()))
    }

    /// Create a task; the store assigns the id
    ///
    /// POST {base}/task
    pub async fn create_task(&self, title: &str, status: &str) -> Result<Task> {
        let body = CreateTaskRequest {
            title: title.to_string(),
            status: status.to_string(),
        };
        let builder = self.request(Method::POST, "task")?.json(&body);
        let response: TaskResponse = self.send_envelope(builder, "create_task").await?;
        response
            .task
            .ok_or_else(|| StoreError::InvalidResponse("missing task".to_string()))
    }

    /// Change the status of a task
    ///
    /// PUT {base}/task/{id}
    ///
    /// The status is not validated here; callers check it against the
    /// allowed statuses first.
    pub async fn set_status(&self, id: &TaskId, status: &str) -> Result<StatusChange> {
        let body = UpdateStatusRequest {
            status: status.to_string(),
        };
        let builder = self
            .request_url(Method::PUT, self.task_url(id)?)
            .json(&body);
        let response: AckResponse = self.send_envelope(builder, "set_status").await?;

        if let Some(echoed) = &response.id {
            if echoed != id {
                return Err(StoreError::InvalidResponse(format!(
                    "status change echoed id {echoed}, expected {id}"
                )));
            }
        }

        Ok(StatusChange {
            id: id.clone(),
            status: response.status.unwrap_or_else(|| status.to_string()),
        })
    }

    /// Delete a task
    ///
    /// DELETE {base}/task/{id}
    pub async fn delete_task(&self, id: &TaskId) -> Result<bool> {
        let builder = self.request_url(Method::DELETE, self.task_url(id)?);
        let response: AckResponse = self.send_envelope(builder, "delete_task").await?;
        Ok(response.response_status)
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{StoreError, TaskStoreClient};
    use crate::types::{StatusChange, Task, TaskId};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TaskStoreClient {
        TaskStoreClient::new(&format!("{}/api/services", server.uri())).expect("client init")
    }

    #[tokio::test]
    async fn test_list_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/services/allstatuses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responseStatus": true,
                "allstatuses": ["WAITING", "ACTIVE", "DONE"]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let statuses = client_for(&server)
            .list_statuses()
            .await
            .expect("list_statuses failed");
        assert_eq!(statuses.as_slice(), ["WAITING", "ACTIVE", "DONE"]);
    }

    #[tokio::test]
    async fn test_list_tasks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/services/tasklist"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responseStatus": true,
                "tasks": [
                    { "id": 1, "title": "Paint roof", "status": "WAITING" },
                    { "id": 2, "title": "Clean windows", "status": "DONE" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tasks = client_for(&server).list_tasks().await.expect("list_tasks failed");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].id, TaskId::from(2));
        assert_eq!(tasks[1].status, "DONE");
    }

    #[tokio::test]
    async fn test_create_task_posts_title_and_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/services/task"))
            .and(body_json(json!({ "title": "Buy milk", "status": "WAITING" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responseStatus": true,
                "task": { "id": 7, "title": "Buy milk", "status": "WAITING" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let task = client_for(&server)
            .create_task("Buy milk", "WAITING")
            .await
            .expect("create_task failed");
        assert_eq!(
            task,
            Task {
                id: TaskId::from(7),
                title: "Buy milk".to_string(),
                status: "WAITING".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_set_status_without_echo_uses_requested_status() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/services/task/7"))
            .and(body_json(json!({ "status": "ACTIVE" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "responseStatus": true })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let change = client_for(&server)
            .set_status(&TaskId::from(7), "ACTIVE")
            .await
            .expect("set_status failed");
        assert_eq!(
            change,
            StatusChange {
                id: TaskId::from(7),
                status: "ACTIVE".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_set_status_rejects_mismatched_echo() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/services/task/7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "responseStatus": true,
                "id": 8,
                "status": "ACTIVE"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .set_status(&TaskId::from(7), "ACTIVE")
            .await
            .expect_err("mismatched id must fail");
        assert!(matches!(err, StoreError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_delete_task() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/services/task/7"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "responseStatus": true })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let deleted = client_for(&server)
            .delete_task(&TaskId::from(7))
            .await
            .expect("delete_task failed");
        assert!(deleted);
    }

    #[tokio::test]
    async fn test_id_with_reserved_characters_stays_in_task_path() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/services/task/a%2Fb"))
            .and(body_json(json!({ "status": "DONE" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "responseStatus": true })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/services/task/..%2Fallstatuses"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "responseStatus": true })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let change = client
            .set_status(&TaskId::from("a/b"), "DONE")
            .await
            .expect("set_status failed");
        assert_eq!(change.id, TaskId::from("a/b"));
        let deleted = client
            .delete_task(&TaskId::from("../allstatuses"))
            .await
            .expect("delete_task failed");
        assert!(deleted);
    }

    #[tokio::test]
    async fn test_response_status_false_is_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/services/task/7"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "responseStatus": false })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .delete_task(&TaskId::from(7))
            .await
            .expect_err("rejection expected");
        assert!(matches!(err, StoreError::Rejected { operation: "delete_task" }));
    }

    #[tokio::test]
    async fn test_missing_payload_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/services/tasklist"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "responseStatus": true })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_tasks()
            .await
            .expect_err("missing tasks must fail");
        assert!(matches!(err, StoreError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_server_error_without_json_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/services/allstatuses"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_statuses()
            .await
            .expect_err("500 must fail");
        match err {
            StoreError::Api { code, message } => {
                assert_eq!(code, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_serialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/services/allstatuses"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_statuses()
            .await
            .expect_err("html must fail");
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
