use std::path::PathBuf;

use tasket_core::TasketError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("task {id}: bad {field} '{value}'")]
    BadField {
        id: String,
        field: &'static str,
        value: String,
    },

    #[error(transparent)]
    Core(#[from] TasketError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Core errors pass through unchanged; everything else becomes `Storage`.
impl From<StoreError> for TasketError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Core(inner) => inner,
            other => TasketError::storage(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
