//! Crate-level error taxonomy for task operations.
//!
//! # Invariants
//! - `Validation` and `NotFound` leave store state unchanged.
//! - `Storage` means the flush failed and the in-memory state was not replaced.

use crate::model::task::{TaskId, TaskValidationError};
use crate::repo::kv_store::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type TaskResult<T> = Result<T, TaskError>;

/// Error surfaced by store and calendar operations.
#[derive(Debug)]
pub enum TaskError {
    Validation(TaskValidationError),
    NotFound(TaskId),
    Storage(StorageError),
}

impl Display for TaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::Storage(err) => write!(f, "failed to persist tasks: {err}"),
        }
    }
}

impl Error for TaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for TaskError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for TaskError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}
