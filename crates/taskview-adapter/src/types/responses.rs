/*
[INPUT]:  Task store response schema and serde requirements
[OUTPUT]: Typed response envelopes carrying the responseStatus flag
[POS]:    Data layer - response types
[UPDATE]: When response envelopes change
*/

use serde::{Deserialize, Serialize};

use super::models::{StatusSet, Task, TaskId};

/// Common shape of every task store response.
pub trait Envelope {
    fn response_status(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusListResponse {
    #[serde(rename = "responseStatus")]
    pub response_status: bool,
    #[serde(default)]
    pub allstatuses: Option<StatusSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskListResponse {
    #[serde(rename = "responseStatus")]
    pub response_status: bool,
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    #[serde(rename = "responseStatus")]
    pub response_status: bool,
    #[serde(default)]
    pub task: Option<Task>,
}

/// PUT/DELETE answer. The store may echo the affected id and status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckResponse {
    #[serde(rename = "responseStatus")]
    pub response_status: bool,
    #[serde(default)]
    pub id: Option<TaskId>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Confirmed outcome of a status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub id: TaskId,
    pub status: String,
}

impl Envelope for StatusListResponse {
    fn response_status(&self) -> bool {
        self.response_status
    }
}

impl Envelope for TaskListResponse {
    fn response_status(&self) -> bool {
        self.response_status
    }
}

impl Envelope for TaskResponse {
    fn response_status(&self) -> bool {
        self.response_status
    }
}

impl Envelope for AckResponse {
    fn response_status(&self) -> bool {
        self.response_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejected_envelope_without_payload_deserializes() {
        let response: TaskResponse =
            serde_json::from_value(json!({ "responseStatus": false })).expect("envelope");
        assert!(!response.response_status());
        assert!(response.task.is_none());
    }

    #[test]
    fn ack_ignores_unknown_fields() {
        let response: AckResponse = serde_json::from_value(json!({
            "responseStatus": true,
            "id": 3,
            "status": "DONE",
            "message": "updated"
        }))
        .expect("ack");
        assert_eq!(response.id, Some(TaskId::from(3)));
        assert_eq!(response.status.as_deref(), Some("DONE"));
    }
}
