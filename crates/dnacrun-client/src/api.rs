//! Controller API surface.
//!
//! [`ControllerApi`] is the seam between the run pipeline and the wire: the
//! real implementation lives on [`ApiClient`], and tests drive the pipeline
//! with in-process fakes.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use dnacrun_core::{CommandRequest, CommandVocabulary, Device, FileId, ResultArtifact, TaskId};

use crate::error::ClientError;
use crate::http::ApiClient;

const READ_REQUEST_PATH: &str = "network-device-poller/cli/read-request";
const LEGIT_READS_PATH: &str = "network-device-poller/cli/legit-reads";
const DEVICE_PATH: &str = "network-device";

/// Controller responses wrap their payload in a `response` field.
#[derive(Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(rename = "taskId")]
    task_id: Option<TaskId>,
}

#[derive(Deserialize)]
struct TaskStatus {
    progress: Option<String>,
}

/// Body for `POST network-device-poller/cli/read-request`: exactly one
/// command and exactly one device per submission.
fn read_request_body(request: &CommandRequest) -> Value {
    json!({
        "commands": [request.command()],
        "deviceUuids": [request.device().as_str()],
    })
}

/// The controller operations the run pipeline and CLI need.
#[async_trait]
pub trait ControllerApi {
    /// List the managed device inventory.
    async fn list_devices(&self) -> Result<Vec<Device>, ClientError>;

    /// Fetch the allow-listed read-command vocabulary.
    async fn legit_reads(&self) -> Result<CommandVocabulary, ClientError>;

    /// Submit one command for one device; returns the task to poll.
    async fn submit(&self, request: &CommandRequest) -> Result<TaskId, ClientError>;

    /// Fetch the raw progress string for a task.
    async fn task_progress(&self, task: &TaskId) -> Result<String, ClientError>;

    /// Fetch and decode a completed task's result file.
    async fn fetch_artifact(&self, file: &FileId) -> Result<ResultArtifact, ClientError>;
}

#[async_trait]
impl ControllerApi for ApiClient {
    async fn list_devices(&self) -> Result<Vec<Device>, ClientError> {
        let envelope: Envelope<Vec<Device>> = self.get_json(DEVICE_PATH).await?;
        if envelope.response.is_empty() {
            return Err(ClientError::NoDevices);
        }
        Ok(envelope.response)
    }

    async fn legit_reads(&self) -> Result<CommandVocabulary, ClientError> {
        let envelope: Envelope<CommandVocabulary> = self.get_json(LEGIT_READS_PATH).await?;
        Ok(envelope.response)
    }

    async fn submit(&self, request: &CommandRequest) -> Result<TaskId, ClientError> {
        let body = read_request_body(request);
        let envelope: Envelope<SubmitResponse> = self.post_json(READ_REQUEST_PATH, &body).await?;
        envelope
            .response
            .task_id
            .ok_or_else(|| ClientError::decode(READ_REQUEST_PATH, "response lacks a taskId"))
    }

    async fn task_progress(&self, task: &TaskId) -> Result<String, ClientError> {
        let path = format!("task/{task}");
        let envelope: Envelope<TaskStatus> = self.get_json(&path).await?;
        envelope
            .response
            .progress
            .ok_or_else(|| ClientError::decode(&path, "response lacks a progress field"))
    }

    async fn fetch_artifact(&self, file: &FileId) -> Result<ResultArtifact, ClientError> {
        let path = format!("file/{file}");
        let artifact: ResultArtifact = self.get_json(&path).await?;
        if artifact.responses().is_none() {
            return Err(ClientError::decode(&path, "artifact has no command responses"));
        }
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnacrun_core::DeviceId;

    #[test]
    fn test_read_request_body_shape() {
        let request = CommandRequest::new(DeviceId::new("abc-123"), "show version").unwrap();
        let body = read_request_body(&request);
        assert_eq!(body["commands"], json!(["show version"]));
        assert_eq!(body["deviceUuids"], json!(["abc-123"]));
    }

    #[test]
    fn test_read_request_body_uses_normalized_command() {
        let request = CommandRequest::new(DeviceId::new("d1"), "  SHOW Clock ").unwrap();
        let body = read_request_body(&request);
        assert_eq!(body["commands"], json!(["show clock"]));
    }

    #[test]
    fn test_envelope_unwraps_task_id() {
        let raw = r#"{"response":{"taskId":"t1","url":"/api/v1/task/t1"}}"#;
        let envelope: Envelope<SubmitResponse> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.response.task_id, Some(TaskId::new("t1")));
    }

    #[test]
    fn test_envelope_tolerates_missing_task_id() {
        let raw = r#"{"response":{"url":"/api/v1/task/t1"}}"#;
        let envelope: Envelope<SubmitResponse> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.response.task_id, None);
    }
}
