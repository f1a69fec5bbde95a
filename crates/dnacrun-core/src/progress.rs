//! Task progress parsing.
//!
//! `GET task/{taskId}` returns its `progress` field as a string. While the
//! task is running the controller fills it with free-text status messages
//! ("CLI Runner request creation"); once the command output has been written
//! it becomes a serialized map carrying a `fileId` key. Presence of that key
//! is the only completion signal the controller gives.

use crate::{CoreError, FileId};
use serde_json::Value;
use std::collections::HashMap;

/// Observed state of a task's progress payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskProgress {
    /// No result-file reference yet; keep polling.
    Pending,
    /// The task finished and published its result file.
    Ready(FileId),
}

impl TaskProgress {
    /// Parse a raw progress string.
    ///
    /// Free-text payloads are `Pending`. A payload that opens a map (`{`)
    /// must decode as one and is an error otherwise — a malformed structured
    /// payload is never treated as "not yet complete". A decoded map without
    /// `fileId` is still `Pending`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if !trimmed.starts_with('{') {
            return Ok(Self::Pending);
        }

        let map: HashMap<String, Value> =
            serde_json::from_str(trimmed).map_err(|e| CoreError::Progress(e.to_string()))?;

        match map.get("fileId") {
            Some(Value::String(id)) => Ok(Self::Ready(FileId::new(id))),
            Some(other) => Err(CoreError::Progress(format!(
                "fileId is not a string: {other}"
            ))),
            None => Ok(Self::Pending),
        }
    }

    /// The result-file reference, if the task is finished.
    pub fn file_id(&self) -> Option<&FileId> {
        match self {
            Self::Ready(id) => Some(id),
            Self::Pending => None,
        }
    }

    /// Returns true if the task has published its result file.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_text_progress_is_pending() {
        let progress = TaskProgress::parse("CLI Runner request creation").unwrap();
        assert_eq!(progress, TaskProgress::Pending);
        assert!(progress.file_id().is_none());
    }

    #[test]
    fn test_map_with_file_id_is_ready() {
        let progress = TaskProgress::parse(r#"{"fileId":"f1"}"#).unwrap();
        assert_eq!(progress, TaskProgress::Ready(FileId::new("f1")));
        assert!(progress.is_ready());
    }

    #[test]
    fn test_map_without_file_id_is_pending() {
        let progress = TaskProgress::parse(r#"{"status":"running"}"#).unwrap();
        assert_eq!(progress, TaskProgress::Pending);
    }

    #[test]
    fn test_malformed_map_is_an_error_not_pending() {
        let err = TaskProgress::parse(r#"{"fileId": "#);
        assert!(matches!(err, Err(CoreError::Progress(_))));
    }

    #[test]
    fn test_non_string_file_id_is_an_error() {
        let err = TaskProgress::parse(r#"{"fileId": 42}"#);
        assert!(matches!(err, Err(CoreError::Progress(_))));
    }

    #[test]
    fn test_parse_is_idempotent_for_ready_tasks() {
        let raw = r#"{"fileId":"f1"}"#;
        let first = TaskProgress::parse(raw).unwrap();
        let second = TaskProgress::parse(raw).unwrap();
        assert_eq!(first, second);
    }
}
