//! Error types for the scheduler module

use std::fmt;
use std::time::Duration;

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// A task with this name is already registered
    DuplicateTask { name: String },

    /// No task is registered under this name
    TaskNotFound { name: String },

    /// Task interval must be greater than zero
    InvalidInterval { name: String, interval: Duration },
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTask { name } => {
                write!(f, "Task '{}' is already registered", name)
            }
            Self::TaskNotFound { name } => {
                write!(f, "Task '{}' not found", name)
            }
            Self::InvalidInterval { name, interval } => {
                write!(
                    f,
                    "Invalid interval {:?} for task '{}'. Must be greater than zero",
                    interval, name
                )
            }
        }
    }
}

impl std::error::Error for SchedulerError {}

impl SchedulerError {
    /// Create a duplicate task error
    pub fn duplicate_task(name: impl Into<String>) -> Self {
        Self::DuplicateTask { name: name.into() }
    }

    /// Create a task not found error
    pub fn task_not_found(name: impl Into<String>) -> Self {
        Self::TaskNotFound { name: name.into() }
    }

    /// Create an invalid interval error
    pub fn invalid_interval(name: impl Into<String>, interval: Duration) -> Self {
        Self::InvalidInterval {
            name: name.into(),
            interval,
        }
    }

    /// Registration and lookup errors never resolve on their own
    pub fn is_recoverable(&self) -> bool {
        false
    }
}
