//! Command requests and the controller's read-only command allow-list.

use crate::{CoreError, DeviceId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One command to run on one device.
///
/// The command string is normalized at construction (whitespace trimmed,
/// lowercased) and that exact normalized form is what gets submitted and
/// later used to index into the result artifact. A request is built fresh
/// for every user-issued command and never reused across tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    device: DeviceId,
    command: String,
}

impl CommandRequest {
    /// Build a request, normalizing the command string.
    ///
    /// Fails with [`CoreError::EmptyCommand`] if nothing remains after
    /// trimming.
    pub fn new(device: DeviceId, command: impl AsRef<str>) -> Result<Self, CoreError> {
        let normalized = command.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(CoreError::EmptyCommand);
        }
        Ok(Self {
            device,
            command: normalized,
        })
    }

    /// Target device identifier.
    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    /// The normalized command string.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// First whitespace-separated token, used for allow-list checks.
    pub fn keyword(&self) -> &str {
        self.command
            .split_whitespace()
            .next()
            .unwrap_or(&self.command)
    }

    /// True when the second whitespace-separated token is a literal `?`,
    /// i.e. a context-help query like `show run ?`.
    pub fn is_help_query(&self) -> bool {
        self.command.split_whitespace().nth(1) == Some("?")
    }
}

/// The allow-listed command vocabulary from
/// `GET network-device-poller/cli/legit-reads`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandVocabulary(Vec<String>);

impl CommandVocabulary {
    /// Create a vocabulary from a list of permitted command keywords.
    pub fn new(commands: Vec<String>) -> Self {
        Self(commands)
    }

    /// True when the request's first token is a permitted keyword.
    ///
    /// Only the keyword is validated; the controller itself rejects
    /// unsupported argument forms per device.
    pub fn permits(&self, request: &CommandRequest) -> bool {
        self.0.iter().any(|c| c == request.keyword())
    }

    /// Number of permitted keywords.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the controller returned no vocabulary at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CommandVocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(cmd: &str) -> CommandRequest {
        CommandRequest::new(DeviceId::new("d1"), cmd).unwrap()
    }

    #[test]
    fn test_command_is_normalized() {
        let req = request("  SHOW Version  ");
        assert_eq!(req.command(), "show version");
        assert_eq!(req.keyword(), "show");
    }

    #[test]
    fn test_empty_command_is_rejected() {
        let err = CommandRequest::new(DeviceId::new("d1"), "   ");
        assert!(matches!(err, Err(CoreError::EmptyCommand)));
    }

    #[test]
    fn test_help_query_detection() {
        assert!(request("show run ?").is_help_query());
        assert!(!request("show run").is_help_query());
        assert!(!request("show").is_help_query());
    }

    #[test]
    fn test_vocabulary_permits_by_keyword() {
        let vocab = CommandVocabulary::new(vec!["show".into(), "ping".into()]);
        assert!(vocab.permits(&request("show ip int brief")));
        assert!(vocab.permits(&request("ping 10.0.0.1")));
        assert!(!vocab.permits(&request("reload now")));
    }

    #[test]
    fn test_vocabulary_display_joins_with_commas() {
        let vocab = CommandVocabulary::new(vec!["show".into(), "ping".into()]);
        assert_eq!(vocab.to_string(), "show, ping");
    }

    #[test]
    fn test_vocabulary_decodes_from_wire_list() {
        let vocab: CommandVocabulary = serde_json::from_str(r#"["show", "traceroute"]"#).unwrap();
        assert_eq!(vocab.len(), 2);
        assert!(!vocab.is_empty());
    }
}
