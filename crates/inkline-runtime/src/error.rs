#![forbid(unsafe_code)]

//! Error taxonomy for live sessions and the task registry.

use std::fmt;
use std::io;

use inkline_core::stream::StreamId;

use crate::registry::TaskId;

/// Errors surfaced by live sessions and the task registry.
#[derive(Debug)]
pub enum LiveError {
    /// A session is already active on this stream.
    AlreadyActive {
        /// The contested stream.
        stream: StreamId,
    },
    /// The task id was never issued or has been removed.
    UnknownTask(TaskId),
    /// Writing to the output stream failed. Terminal for the session.
    WriteFailure(io::Error),
    /// Strict total policy: the operation would push `completed` past `total`.
    InvalidTotal {
        /// The task.
        id: TaskId,
        /// Its declared total.
        total: f64,
        /// The completion the operation would have produced.
        attempted: f64,
    },
    /// A configuration value is out of range or unparsable.
    InvalidConfig(String),
}

impl fmt::Display for LiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiveError::AlreadyActive { stream } => {
                write!(f, "a live session is already active on {stream}")
            }
            LiveError::UnknownTask(id) => write!(f, "unknown task: {id}"),
            LiveError::WriteFailure(e) => write!(f, "terminal write failed: {e}"),
            LiveError::InvalidTotal {
                id,
                total,
                attempted,
            } => write!(
                f,
                "{id}: completion {attempted} exceeds declared total {total}"
            ),
            LiveError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for LiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LiveError::WriteFailure(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LiveError {
    fn from(e: io::Error) -> Self {
        LiveError::WriteFailure(e)
    }
}

/// Result type for live-region operations.
pub type LiveResult<T> = Result<T, LiveError>;
