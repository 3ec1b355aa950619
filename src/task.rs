//! Export task lifecycle
//!
//! Driving a Notion export means enqueueing a task, then polling the status
//! endpoint until the task reports success with a download URL or lands in a
//! state it cannot leave. The poll loop sleeps for the configured interval
//! before every status query, including the first, and never has more than
//! one query in flight per task.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::block_id::BlockId;
use crate::error::{Error, Result};
use crate::exporter::NotionExporter;

/// API path for submitting an export task
const ENQUEUE_TASK_PATH: &str = "enqueueTask";
/// API path for querying task status
const GET_TASKS_PATH: &str = "getTasks";

/// Opaque id of a remote export task
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// View the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Lifecycle state reported for an export task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Queued but not yet picked up by the remote exporter
    NotStarted,
    /// Being rendered
    InProgress,
    /// Finished; the status record carries the download URL
    Success,
    /// Failed on the remote side
    Failure,
    /// Any state string this client does not recognize; treated as failure
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// Whether the task is still moving toward completion
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskState::NotStarted | TaskState::InProgress)
    }
}

/// Progress details attached to a task record
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    /// Pre-signed archive URL, present once the export succeeds
    #[serde(rename = "exportURL", default, skip_serializing_if = "Option::is_none")]
    pub export_url: Option<String>,
}

/// One export task record as returned by the status endpoint
///
/// Records are re-fetched on every poll, never mutated locally. Fields the
/// API sends beyond these are ignored; a record missing `id` or `state` is a
/// deserialization error surfaced to the caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTask {
    /// Opaque task id
    pub id: TaskId,
    /// Current lifecycle state
    pub state: TaskState,
    /// Progress details; absent while the task is queued
    #[serde(default)]
    pub status: TaskStatus,
}

// ---------------------------------------------------------------------------
// Wire bodies
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct EnqueueTaskRequest<'a> {
    task: ExportTaskSpec<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportTaskSpec<'a> {
    event_name: &'static str,
    request: ExportRequest<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportRequest<'a> {
    block: BlockRef<'a>,
    recursive: bool,
    export_options: ExportOptions<'a>,
}

#[derive(Serialize)]
struct BlockRef<'a> {
    id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportOptions<'a> {
    export_type: &'static str,
    /// Sent as the string "no_files" to exclude embedded media; the key is
    /// omitted entirely when media is included
    #[serde(skip_serializing_if = "Option::is_none")]
    include_contents: Option<&'static str>,
    time_zone: &'a str,
    locale: &'a str,
    collection_view_export_type: crate::config::CollectionViewExportType,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnqueueTaskResponse {
    task_id: TaskId,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GetTasksRequest<'a> {
    task_ids: [&'a TaskId; 1],
}

#[derive(Deserialize)]
struct GetTasksResponse {
    results: Vec<ExportTask>,
}

// ---------------------------------------------------------------------------
// Task driver
// ---------------------------------------------------------------------------

impl NotionExporter {
    /// Submit an export job for a block and return the remote task id
    pub async fn enqueue_export(&self, block: &BlockId) -> Result<TaskId> {
        let include_contents = if self.config.include_contents {
            None
        } else {
            Some("no_files")
        };

        let request = EnqueueTaskRequest {
            task: ExportTaskSpec {
                event_name: "exportBlock",
                request: ExportRequest {
                    block: BlockRef { id: block.as_str() },
                    recursive: self.config.recursive,
                    export_options: ExportOptions {
                        export_type: "markdown",
                        include_contents,
                        time_zone: &self.config.time_zone,
                        locale: &self.config.locale,
                        collection_view_export_type: self.config.collection_view_export_type,
                    },
                },
            },
        };

        debug!(block_id = %block, recursive = self.config.recursive, "enqueueing export task");

        let response: EnqueueTaskResponse = self.post_json(ENQUEUE_TASK_PATH, &request).await?;

        info!(task_id = %response.task_id, block_id = %block, "export task enqueued");
        Ok(response.task_id)
    }

    /// Fetch the current record of one export task
    ///
    /// The status endpoint is batch-shaped; the response is searched for the
    /// record matching the queried id.
    pub(crate) async fn fetch_task(&self, task_id: &TaskId) -> Result<ExportTask> {
        let request = GetTasksRequest {
            task_ids: [task_id],
        };
        let response: GetTasksResponse = self.post_json(GET_TASKS_PATH, &request).await?;

        response
            .results
            .into_iter()
            .find(|task| task.id == *task_id)
            .ok_or_else(|| Error::TaskNotFound {
                task_id: task_id.clone(),
            })
    }

    /// Poll an export task until it yields an archive download URL
    ///
    /// Sleeps for `poll_interval_ms` before every status query, including the
    /// first. Pending states re-arm the delay at a fixed interval with no
    /// backoff; without `max_poll_ms` the loop runs until the remote task
    /// resolves. A success record without a URL is treated as a failure.
    pub async fn await_export_url(&self, task_id: &TaskId) -> Result<String> {
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms);
        let max_poll = self.config.max_poll_ms.map(Duration::from_millis);
        let started = Instant::now();

        loop {
            tokio::time::sleep(poll_interval).await;

            if let Some(limit) = max_poll {
                if started.elapsed() >= limit {
                    warn!(
                        task_id = %task_id,
                        waited = ?started.elapsed(),
                        "gave up waiting for export task"
                    );
                    return Err(Error::TaskTimeout {
                        task_id: task_id.clone(),
                        waited: started.elapsed(),
                    });
                }
            }

            let task = self.fetch_task(task_id).await?;
            debug!(task_id = %task_id, state = ?task.state, "export task status");

            if task.state == TaskState::Success {
                if let Some(url) = task.status.export_url {
                    info!(task_id = %task_id, "export task finished");
                    return Ok(url);
                }
                // success without a URL cannot be downloaded
            } else if task.state.is_pending() {
                continue;
            }

            warn!(task_id = %task_id, state = ?task.state, "export task did not succeed");
            return Err(Error::TaskFailed { task });
        }
    }
}
