/*
[INPUT]:  Task store request schema and serde requirements
[OUTPUT]: Typed request bodies for POST /task and PUT /task/{id}
[POS]:    Data layer - request types
[UPDATE]: When request bodies change
*/

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}
