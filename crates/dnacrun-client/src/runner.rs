//! The command-run pipeline: submit → poll → fetch → resolve.
//!
//! One invocation owns one task. Submission must yield a task id before
//! polling starts, polling must reach a terminal state before the result
//! file is fetched, and the caller gets exactly one terminal outcome per
//! submitted command.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use dnacrun_core::{
    CommandOutcome, CommandRequest, FileId, ResolveError, ResolvePolicy, TaskId, TaskProgress,
};

use crate::api::ControllerApi;
use crate::error::ClientError;

/// Polling budget for one task.
///
/// The controller gives no completion event, so completion is detected by
/// bounded polling: a fixed delay between ticks and a strict attempt budget.
/// CLI read tasks have been observed to take up to ~20 s, hence the
/// defaults.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Delay between poll ticks.
    pub interval: Duration,

    /// Maximum number of poll ticks before giving up.
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 20,
        }
    }
}

/// Why one command run did not produce a device-reported outcome.
///
/// All of these are terminal for the current command only; an interactive
/// session recovers by prompting for the next command.
#[derive(Debug, Error)]
pub enum RunError {
    /// Task creation failed or the response lacked a task id.
    #[error("command submission failed: {0}")]
    Submission(#[source] ClientError),

    /// A status fetch failed or the progress payload was malformed.
    #[error("polling task {task_id} failed: {reason}")]
    Poll { task_id: TaskId, reason: String },

    /// The poll budget elapsed before the task produced a result file.
    #[error("task {task_id} did not complete within {attempts} polls")]
    TimedOut { task_id: TaskId, attempts: u32 },

    /// The result file could not be fetched or decoded.
    #[error("fetching result file {file_id} failed")]
    Fetch {
        file_id: FileId,
        #[source]
        source: ClientError,
    },

    /// The artifact was readable but held no output for this command.
    #[error(transparent)]
    Output(#[from] ResolveError),
}

/// Runs one command through the controller and resolves its outcome.
pub struct CommandRunner<A> {
    api: A,
    poll: PollPolicy,
    resolve: ResolvePolicy,
}

impl<A: ControllerApi> CommandRunner<A> {
    /// Create a runner with default poll and resolve policies.
    pub fn new(api: A) -> Self {
        Self {
            api,
            poll: PollPolicy::default(),
            resolve: ResolvePolicy::default(),
        }
    }

    /// Override the polling budget.
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Override artifact interpretation.
    pub fn with_resolve_policy(mut self, resolve: ResolvePolicy) -> Self {
        self.resolve = resolve;
        self
    }

    /// Access the underlying API, e.g. for inventory listing.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Run one command to a terminal outcome.
    pub async fn run(&self, request: &CommandRequest) -> Result<CommandOutcome, RunError> {
        let task_id = self
            .api
            .submit(request)
            .await
            .map_err(RunError::Submission)?;
        info!(task_id = %task_id, command = request.command(), "Command submitted");

        let file_id = self.poll_until_ready(&task_id).await?;
        debug!(task_id = %task_id, file_id = %file_id, "Task finished");

        let artifact = self
            .api
            .fetch_artifact(&file_id)
            .await
            .map_err(|source| RunError::Fetch { file_id, source })?;

        Ok(artifact.resolve(request, self.resolve)?)
    }

    /// Poll the task until it publishes a result file.
    ///
    /// Terminal exits: `Ready` (the returned file id), a poll failure, or
    /// the exhausted budget. A transport failure is not retried, and a
    /// malformed structured progress payload is an error, never "pending".
    async fn poll_until_ready(&self, task_id: &TaskId) -> Result<FileId, RunError> {
        for attempt in 1..=self.poll.max_attempts {
            let raw = self
                .api
                .task_progress(task_id)
                .await
                .map_err(|e| RunError::Poll {
                    task_id: task_id.clone(),
                    reason: e.to_string(),
                })?;

            match TaskProgress::parse(&raw) {
                Ok(TaskProgress::Ready(file_id)) => return Ok(file_id),
                Ok(TaskProgress::Pending) => {
                    debug!(task_id = %task_id, attempt, "Task still pending");
                }
                Err(e) => {
                    return Err(RunError::Poll {
                        task_id: task_id.clone(),
                        reason: e.to_string(),
                    })
                }
            }

            if attempt < self.poll.max_attempts {
                tokio::time::sleep(self.poll.interval).await;
            }
        }

        Err(RunError::TimedOut {
            task_id: task_id.clone(),
            attempts: self.poll.max_attempts,
        })
    }
}
