//! Error types for intake.
//!
//! [`Error`] is what adapters and configuration return. [`PipelineError`]
//! is what the admission and query services return: it names the stage
//! that failed and carries the adapter error as its cause.

use std::time::Duration;

use thiserror::Error;

use crate::model::RequestId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("operation timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("request {0} already exists")]
    Duplicate(RequestId),

    #[error("{0}")]
    Pipeline(Box<PipelineError>),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// The external call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Persist,
    Publish,
    Query,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Persist => "persist",
            Stage::Publish => "publish",
            Stage::Query => "query",
        };
        write!(f, "{s}")
    }
}

/// Failure of an admission or query, as reported to the caller.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The store write failed or timed out. Nothing was published.
    #[error("failed to persist request: {cause}")]
    Persist {
        #[source]
        cause: Error,
    },

    /// The record was written but the queue publish failed or timed out.
    /// The record stays in the store at `RECEIVED` (orphaned).
    #[error("request {request_id} was recorded but not queued: {cause}")]
    Publish {
        request_id: RequestId,
        #[source]
        cause: Error,
    },

    /// The store read for a listing failed or timed out.
    #[error("failed to list requests: {cause}")]
    Query {
        #[source]
        cause: Error,
    },

    #[error("method {method} is not supported")]
    UnsupportedOperation { method: String },
}

impl PipelineError {
    /// Stage of an external-call failure; `None` for unsupported operations.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Persist { .. } => Some(Stage::Persist),
            PipelineError::Publish { .. } => Some(Stage::Publish),
            PipelineError::Query { .. } => Some(Stage::Query),
            PipelineError::UnsupportedOperation { .. } => None,
        }
    }

    /// The underlying adapter error, if any.
    pub fn cause(&self) -> Option<&Error> {
        match self {
            PipelineError::Persist { cause }
            | PipelineError::Publish { cause, .. }
            | PipelineError::Query { cause } => Some(cause),
            PipelineError::UnsupportedOperation { .. } => None,
        }
    }
}

impl From<PipelineError> for Error {
    fn from(err: PipelineError) -> Self {
        Error::Pipeline(Box::new(err))
    }
}
