//! Error types for notion-exporter
//!
//! This module provides error handling for the library, including:
//! - Input validation errors (malformed block ids and URLs)
//! - Transport errors (network failures, non-success API replies)
//! - Export task lifecycle errors (failed, missing, or timed-out tasks)
//! - Archive errors (corrupt downloads, missing entries)

use std::time::Duration;
use thiserror::Error;

use crate::task::{ExportTask, TaskId};

/// Result type alias for notion-exporter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for notion-exporter
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Input is neither a block id nor a URL on a recognized Notion domain
    #[error("invalid block id or URL: {input}")]
    InvalidBlockId {
        /// The rejected input string
        input: String,
    },

    /// Credential contains characters that cannot be sent in a Cookie header
    #[error("credential contains characters not allowed in a Cookie header")]
    InvalidCredentials,

    /// Network error (connect, timeout, body read)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The export API answered with a non-success HTTP status
    #[error("export API call {endpoint} failed with status {status}: {body}")]
    Api {
        /// API path or URL that was called
        endpoint: String,
        /// HTTP status code of the reply
        status: u16,
        /// Response body text, for diagnostics
        body: String,
    },

    /// Status query response did not contain the queried task
    #[error("task {task_id} missing from status response")]
    TaskNotFound {
        /// Id of the task that was queried
        task_id: TaskId,
    },

    /// Export task ended in a terminal state other than success
    #[error("export task {} ended in state {:?}", task.id, task.state)]
    TaskFailed {
        /// Last task record observed before giving up
        task: ExportTask,
    },

    /// Export task did not finish within the configured maximum poll time
    #[error("export task {task_id} still pending after {waited:?}")]
    TaskTimeout {
        /// Id of the task that was being polled
        task_id: TaskId,
        /// Total time spent waiting before giving up
        waited: Duration,
    },

    /// Downloaded bytes are not a readable ZIP archive
    #[error("corrupt export archive: {reason}")]
    CorruptArchive {
        /// Description of the parse failure
        reason: String,
    },

    /// No archive entry matched the requested name predicate, or the matched
    /// entry was empty after trimming
    #[error("could not find a matching file in the export archive")]
    FileNotFound,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL construction or parse error
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}
