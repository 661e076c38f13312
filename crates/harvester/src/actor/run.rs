use std::fmt::Display;

use serde::Deserialize;

/// Lifecycle status of an actor run as reported by the provider.
///
/// Statuses the provider may add later deserialize as [`RunStatus::Unknown`]
/// and are treated as non-terminal, so polling keeps going until the
/// wall-clock budget decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RunStatus {
    #[serde(rename = "RUNNING")]
    Running,
    #[serde(rename = "SUCCEEDED")]
    Succeeded,
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "ABORTED")]
    Aborted,
    #[serde(rename = "TIMED-OUT")]
    TimedOut,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::Aborted | RunStatus::TimedOut
        )
    }
}

impl Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunStatus::Running => "RUNNING",
            RunStatus::Succeeded => "SUCCEEDED",
            RunStatus::Failed => "FAILED",
            RunStatus::Aborted => "ABORTED",
            RunStatus::TimedOut => "TIMED-OUT",
            RunStatus::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// One asynchronous scraping job. Ephemeral: created per call, discarded
/// after item retrieval or failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRun {
    pub id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub default_dataset_id: Option<String>,
}

/// Provider responses wrap the run object in a `data` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct RunEnvelope {
    pub data: ActorRun,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_provider_envelope() {
        let body = r#"{"data":{"id":"run-1","status":"RUNNING","defaultDatasetId":"ds-1"}}"#;
        let envelope: RunEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.data.id, "run-1");
        assert_eq!(envelope.data.status, RunStatus::Running);
        assert_eq!(envelope.data.default_dataset_id.as_deref(), Some("ds-1"));
    }

    #[test]
    fn timed_out_uses_the_hyphenated_wire_form() {
        let status: RunStatus = serde_json::from_str(r#""TIMED-OUT""#).unwrap();
        assert_eq!(status, RunStatus::TimedOut);
        assert!(status.is_terminal());
        assert_eq!(status.to_string(), "TIMED-OUT");
    }

    #[test]
    fn unfamiliar_statuses_are_non_terminal() {
        let status: RunStatus = serde_json::from_str(r#""READY""#).unwrap();
        assert_eq!(status, RunStatus::Unknown);
        assert!(!status.is_terminal());
    }

    #[test]
    fn terminal_statuses_are_terminal() {
        for raw in [r#""SUCCEEDED""#, r#""FAILED""#, r#""ABORTED""#] {
            let status: RunStatus = serde_json::from_str(raw).unwrap();
            assert!(status.is_terminal());
        }
    }
}
