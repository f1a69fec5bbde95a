//! Result artifacts and outcome resolution.
//!
//! `GET file/{fileId}` returns a JSON sequence; its first element carries a
//! `commandResponses` object with per-command output text keyed under
//! `SUCCESS`, `FAILURE`, and `BLACKLISTED` maps. The key is the exact
//! normalized command string that was submitted.

use crate::CommandRequest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Per-command output maps inside one artifact entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponses {
    /// Output of commands the device ran successfully.
    #[serde(rename = "SUCCESS", default)]
    pub success: HashMap<String, String>,

    /// Diagnostics for commands the device rejected or failed to run.
    #[serde(rename = "FAILURE", default)]
    pub failure: HashMap<String, String>,

    /// Commands the controller refused to forward. Present on the wire but
    /// unreachable here: submission is gated on the allow-list first.
    #[serde(rename = "BLACKLISTED", default)]
    pub blacklisted: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ArtifactEntry {
    #[serde(rename = "commandResponses")]
    command_responses: CommandResponses,
}

/// The decoded result file for one completed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultArtifact(Vec<ArtifactEntry>);

/// How ambiguous artifacts are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvePolicy {
    /// Surface FAILURE text as displayable output for `?` help queries whose
    /// output the controller keyed under FAILURE without flagging a failure.
    /// This mirrors observed controller behavior for context-help commands
    /// and applies to no other command shape.
    pub help_query_fallback: bool,
}

impl Default for ResolvePolicy {
    fn default() -> Self {
        Self {
            help_query_fallback: true,
        }
    }
}

/// Terminal outcome of one command, as reported by the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The device ran the command; its output text.
    Success(String),
    /// The device rejected or could not run the command. A legitimate
    /// outcome surfaced verbatim, not a system error.
    Failure(String),
    /// Context-help output recovered through the FAILURE-map fallback.
    HelpText(String),
}

impl CommandOutcome {
    /// The displayable output text, whatever the branch.
    pub fn text(&self) -> &str {
        match self {
            Self::Success(t) | Self::Failure(t) | Self::HelpText(t) => t,
        }
    }
}

/// The artifact was readable but this command's output was not where the
/// container format says it should be.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No entry for the command under SUCCESS or FAILURE. Carries the raw
    /// artifact so the operator can see what the controller actually sent.
    #[error("no output found for command '{command}' in result artifact")]
    OutputNotFound {
        command: String,
        raw_artifact: String,
    },
}

impl ResultArtifact {
    /// The command-response maps, if the artifact has any entries.
    pub fn responses(&self) -> Option<&CommandResponses> {
        self.0.first().map(|entry| &entry.command_responses)
    }

    /// Decide the outcome for the exact command string that was submitted.
    ///
    /// FAILURE takes precedence: a non-empty FAILURE entry for the command
    /// means the device reported a failure, regardless of what else the
    /// artifact holds. Otherwise the SUCCESS entry is the output. A command
    /// present under neither map is [`ResolveError::OutputNotFound`], except
    /// for the help-query fallback described on [`ResolvePolicy`].
    pub fn resolve(
        &self,
        request: &CommandRequest,
        policy: ResolvePolicy,
    ) -> Result<CommandOutcome, ResolveError> {
        let cmd = request.command();
        let not_found = || ResolveError::OutputNotFound {
            command: cmd.to_owned(),
            raw_artifact: self.to_json_pretty(),
        };

        let responses = self.responses().ok_or_else(not_found)?;

        if policy.help_query_fallback && request.is_help_query() {
            // Help-query output is keyed under FAILURE without being a real
            // failure; prefer SUCCESS if the controller did key it there.
            if let Some(text) = responses.success.get(cmd) {
                return Ok(CommandOutcome::Success(text.clone()));
            }
            if let Some(text) = responses.failure.get(cmd) {
                return Ok(CommandOutcome::HelpText(text.clone()));
            }
            return Err(not_found());
        }

        if let Some(text) = responses.failure.get(cmd).filter(|t| !t.is_empty()) {
            return Ok(CommandOutcome::Failure(text.clone()));
        }

        if let Some(text) = responses.success.get(cmd) {
            return Ok(CommandOutcome::Success(text.clone()));
        }

        Err(not_found())
    }

    /// Pretty-printed artifact JSON for diagnostics.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeviceId;

    fn request(cmd: &str) -> CommandRequest {
        CommandRequest::new(DeviceId::new("d1"), cmd).unwrap()
    }

    fn artifact(success: &[(&str, &str)], failure: &[(&str, &str)]) -> ResultArtifact {
        let to_map = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>()
        };
        ResultArtifact(vec![ArtifactEntry {
            command_responses: CommandResponses {
                success: to_map(success),
                failure: to_map(failure),
                blacklisted: HashMap::new(),
            },
        }])
    }

    #[test]
    fn test_failure_entry_wins_over_success_path() {
        let artifact = artifact(&[], &[("show version", "% connection refused")]);
        let outcome = artifact
            .resolve(&request("show version"), ResolvePolicy::default())
            .unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::Failure("% connection refused".into())
        );
    }

    #[test]
    fn test_success_text_is_returned_exactly() {
        let artifact = artifact(&[("show ip int brief", "Interface  IP-Address  Status")], &[]);
        let outcome = artifact
            .resolve(&request("show ip int brief"), ResolvePolicy::default())
            .unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::Success("Interface  IP-Address  Status".into())
        );
    }

    #[test]
    fn test_help_query_falls_back_to_failure_map() {
        // Controller quirk: `?` output lands under FAILURE even though no
        // failure occurred.
        let artifact = artifact(&[], &[("show run ?", "all    brief    | ")]);
        let outcome = artifact
            .resolve(&request("show run ?"), ResolvePolicy::default())
            .unwrap();
        assert_eq!(outcome, CommandOutcome::HelpText("all    brief    | ".into()));
    }

    #[test]
    fn test_help_query_prefers_success_when_present() {
        let artifact = artifact(&[("show run ?", "all    brief")], &[]);
        let outcome = artifact
            .resolve(&request("show run ?"), ResolvePolicy::default())
            .unwrap();
        assert_eq!(outcome, CommandOutcome::Success("all    brief".into()));
    }

    #[test]
    fn test_disabled_help_fallback_reports_a_plain_failure() {
        let artifact = artifact(&[], &[("show run ?", "all    brief")]);
        let policy = ResolvePolicy {
            help_query_fallback: false,
        };
        let outcome = artifact.resolve(&request("show run ?"), policy).unwrap();
        assert_eq!(outcome, CommandOutcome::Failure("all    brief".into()));
    }

    #[test]
    fn test_missing_output_reports_raw_artifact() {
        let artifact = artifact(&[("show clock", "12:00:00")], &[]);
        let err = artifact
            .resolve(&request("show version"), ResolvePolicy::default())
            .unwrap_err();
        let ResolveError::OutputNotFound {
            command,
            raw_artifact,
        } = err;
        assert_eq!(command, "show version");
        assert!(raw_artifact.contains("show clock"));
    }

    #[test]
    fn test_empty_artifact_is_output_not_found() {
        let artifact = ResultArtifact(Vec::new());
        let err = artifact.resolve(&request("show version"), ResolvePolicy::default());
        assert!(matches!(err, Err(ResolveError::OutputNotFound { .. })));
    }

    #[test]
    fn test_artifact_decodes_wire_shape() {
        let raw = r#"[{"commandResponses":{
            "SUCCESS":{"show version":"Cisco IOS XE Software"},
            "FAILURE":{},
            "BLACKLISTED":{}
        }}]"#;
        let artifact: ResultArtifact = serde_json::from_str(raw).unwrap();
        let outcome = artifact
            .resolve(&request("show version"), ResolvePolicy::default())
            .unwrap();
        assert_eq!(outcome.text(), "Cisco IOS XE Software");
    }
}
