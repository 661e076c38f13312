use std::time::Duration;

use reqwest::StatusCode;

use crate::actor::RunStatus;
use crate::item::Platform;

#[derive(Debug, thiserror::Error)]
pub enum HarvesterError {
    /// A required credential is absent. Raised synchronously, before any
    /// network activity.
    #[error("missing credential: environment variable `{var}` is not set")]
    MissingCredential { var: &'static str },

    /// The provider refused to start an actor run. Carries the raw provider
    /// error text; never retried by this layer.
    #[error("actor `{actor_id}` failed to start: {body}")]
    ActorStart { actor_id: String, body: String },

    /// An actor run reached a terminal, non-success status.
    #[error("actor `{actor_id}` run ended with status {status}")]
    ActorRunFailed { actor_id: String, status: RunStatus },

    /// An actor run never reached a terminal status within the wall-clock
    /// budget. Distinct from [`HarvesterError::ActorRunFailed`].
    #[error("actor `{actor_id}` run still not terminal after {waited:?}")]
    PollingTimeout { actor_id: String, waited: Duration },

    /// A succeeded run came back without a dataset to read items from.
    #[error("actor `{actor_id}` succeeded without a dataset id")]
    MissingDataset { actor_id: String },

    /// The caller-supplied identifier cannot be canonicalized for the
    /// platform's actor input.
    #[error("invalid {platform} identifier `{input}`")]
    InvalidIdentifier { platform: Platform, input: String },

    #[error("unknown platform `{input}`")]
    UnknownPlatform { input: String },

    #[error("request failed with HTTP {status} for {url}")]
    HttpStatus { status: StatusCode, url: String },

    #[error("HTTP request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}
