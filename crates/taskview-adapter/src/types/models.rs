/*
[INPUT]:  Task store JSON schema and serde requirements
[OUTPUT]: Task, TaskId and StatusSet domain types
[POS]:    Data layer - domain types shared by the client and the controller
[UPDATE]: When the task schema changes or new fields are added
*/

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum title length accepted by the task input field (counted in chars).
pub const MAX_TITLE_CHARS: usize = 80;

/// Server-assigned task identifier.
///
/// The store may send ids as JSON numbers or strings; both are kept verbatim
/// in textual form and used as-is in request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde_helpers::deserialize_task_id(deserializer).map(TaskId)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub status: String,
}

/// Ordered, de-duplicated list of allowed status labels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusSet(Vec<String>);

impl StatusSet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut statuses: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if !statuses.contains(&label) {
                statuses.push(label);
            }
        }
        Self(statuses)
    }

    pub fn contains(&self, status: &str) -> bool {
        self.0.iter().any(|candidate| candidate == status)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn position(&self, status: &str) -> Option<usize> {
        self.0.iter().position(|candidate| candidate == status)
    }
}

impl<'de> Deserialize<'de> for StatusSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let labels: Vec<String> = Vec::deserialize(deserializer)?;
        Ok(StatusSet::new(labels))
    }
}

mod serde_helpers {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize_task_id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(raw) if !raw.trim().is_empty() => Ok(raw),
            Value::Number(number) => Ok(number.to_string()),
            _ => Err(serde::de::Error::custom("task id must be a number or a non-empty string")),
        }
    }
}
