/*
[INPUT]:  Store failures, user input and lifecycle guards
[OUTPUT]: ControllerError / ValidationError and the ErrorKind taxonomy
[POS]:    Controller layer - error surface shown in the status bar and logs
[UPDATE]: When a new failure class or validation rule is added
*/

use taskview_adapter::{FailureKind, MAX_TITLE_CHARS, StatusSet, StoreError, TaskId};
use thiserror::Error;

use super::LifecycleState;

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Task title must not be empty")]
    EmptyTitle,

    #[error("Task title is too long ({actual} > {max} characters)")]
    TitleTooLong { max: usize, actual: usize },

    #[error("Unknown status: {status}")]
    UnknownStatus { status: String },
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("{operation} failed: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Task {id} already has an operation in flight")]
    ConcurrencyConflict { id: TaskId },

    #[error("Unknown task: {id}")]
    UnknownTask { id: TaskId },

    #[error("Controller is not accepting changes while {state}")]
    NotReady { state: LifecycleState },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkFailure,
    ServerRejection,
    ValidationFailure,
    ConcurrencyConflict,
}

impl ControllerError {
    pub fn store(operation: &'static str, source: StoreError) -> Self {
        Self::Store { operation, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store { source, .. } => match source.category() {
                FailureKind::Network => ErrorKind::NetworkFailure,
                FailureKind::ServerRejection => ErrorKind::ServerRejection,
            },
            Self::Validation(_) | Self::UnknownTask { .. } | Self::NotReady { .. } => {
                ErrorKind::ValidationFailure
            }
            Self::ConcurrencyConflict { .. } => ErrorKind::ConcurrencyConflict,
        }
    }
}

/// Check a trimmed title against the input bounds.
pub fn validate_title(title: &str) -> Result<&str, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let actual = trimmed.chars().count();
    if actual > MAX_TITLE_CHARS {
        return Err(ValidationError::TitleTooLong {
            max: MAX_TITLE_CHARS,
            actual,
        });
    }
    Ok(trimmed)
}

pub fn validate_status(status: &str, statuses: &StatusSet) -> Result<(), ValidationError> {
    if statuses.contains(status) {
        Ok(())
    } else {
        Err(ValidationError::UnknownStatus {
            status: status.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", Err(ValidationError::EmptyTitle))]
    #[case("   ", Err(ValidationError::EmptyTitle))]
    #[case("  Buy milk ", Ok("Buy milk"))]
    fn title_bounds(#[case] input: &str, #[case] expected: Result<&str, ValidationError>) {
        assert_eq!(validate_title(input), expected);
    }

    #[test]
    fn title_limit_counts_chars() {
        let exact = "é".repeat(MAX_TITLE_CHARS);
        assert!(validate_title(&exact).is_ok());
        let over = "x".repeat(MAX_TITLE_CHARS + 1);
        assert_eq!(
            validate_title(&over),
            Err(ValidationError::TitleTooLong {
                max: MAX_TITLE_CHARS,
                actual: MAX_TITLE_CHARS + 1,
            })
        );
    }

    #[test]
    fn error_kinds_follow_store_category() {
        let rejected = ControllerError::store(
            "delete_task",
            StoreError::Rejected {
                operation: "delete_task",
            },
        );
        assert_eq!(rejected.kind(), ErrorKind::ServerRejection);

        let timeout = ControllerError::store("set_status", StoreError::Timeout { duration: 15 });
        assert_eq!(timeout.kind(), ErrorKind::NetworkFailure);

        let conflict = ControllerError::ConcurrencyConflict { id: TaskId::from(7) };
        assert_eq!(conflict.kind(), ErrorKind::ConcurrencyConflict);

        let invalid = ControllerError::from(ValidationError::EmptyTitle);
        assert_eq!(invalid.kind(), ErrorKind::ValidationFailure);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let statuses = StatusSet::new(["WAITING", "DONE"]);
        assert!(validate_status("DONE", &statuses).is_ok());
        assert_eq!(
            validate_status("done", &statuses),
            Err(ValidationError::UnknownStatus {
                status: "done".to_string()
            })
        );
    }
}
