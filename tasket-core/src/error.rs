//! Error types for tasket-core.

use thiserror::Error;

/// Errors raised by the prioritization core and its collaborators.
#[derive(Error, Debug)]
pub enum TasketError {
    /// Invalid task attribute, velocity, or list name. Never clamped.
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// Lookup by task ID found nothing.
    #[error("task not found: {0}")]
    NotFound(String),

    /// Misconfigured algorithm parameters (e.g. a zero interleave stride).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Failure inside a task source or state store.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TasketError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(err))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

pub type Result<T> = std::result::Result<T, TasketError>;
