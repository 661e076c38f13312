//! Client for the asynchronous scraping-job provider.
//!
//! Actor jobs are background computations, not request/response calls: a run
//! is submitted, polled on a fixed interval until it reaches a terminal
//! status, and its result dataset fetched afterwards. Polling suspends only
//! the task awaiting that run, so concurrent fetches for other platforms make
//! progress undisturbed.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::run::{ActorRun, RunEnvelope, RunStatus};
use crate::config::ActorConfig;
use crate::error::HarvesterError;

pub struct ActorClient {
    config: ActorConfig,
    http: Client,
}

impl ActorClient {
    pub fn new(config: ActorConfig) -> Result<Self, HarvesterError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { config, http })
    }

    /// Build a client from the process environment. Fails fast on a missing
    /// credential, before any network call.
    pub fn from_env() -> Result<Self, HarvesterError> {
        Self::new(ActorConfig::from_env()?)
    }

    pub fn config(&self) -> &ActorConfig {
        &self.config
    }

    /// Submit a job to `actor_id` and poll until it terminates, returning the
    /// raw result dataset.
    ///
    /// The start call is never resubmitted on failure; callers own any
    /// higher-level routing decisions.
    pub async fn run_actor<T: DeserializeOwned>(
        &self,
        actor_id: &str,
        input: &Value,
    ) -> Result<Vec<T>, HarvesterError> {
        self.run_actor_with_timeout(actor_id, input, self.config.run_timeout)
            .await
    }

    pub async fn run_actor_with_timeout<T: DeserializeOwned>(
        &self,
        actor_id: &str,
        input: &Value,
        timeout: Duration,
    ) -> Result<Vec<T>, HarvesterError> {
        let started = tokio::time::Instant::now();
        let deadline = started + timeout;

        let mut run = self.start_run(actor_id, input).await?;
        debug!(actor_id, run_id = %run.id, "actor run started");

        while !run.status.is_terminal() {
            if tokio::time::Instant::now() >= deadline {
                warn!(actor_id, run_id = %run.id, "actor run exceeded the polling budget");
                return Err(HarvesterError::PollingTimeout {
                    actor_id: actor_id.to_string(),
                    waited: started.elapsed(),
                });
            }
            tokio::time::sleep(self.config.poll_interval).await;
            run = self.run_status(&run.id).await?;
        }

        match run.status {
            RunStatus::Succeeded => {
                let dataset_id =
                    run.default_dataset_id
                        .ok_or_else(|| HarvesterError::MissingDataset {
                            actor_id: actor_id.to_string(),
                        })?;
                debug!(actor_id, dataset_id = %dataset_id, "fetching result dataset");
                self.dataset_items(&dataset_id).await
            }
            status => Err(HarvesterError::ActorRunFailed {
                actor_id: actor_id.to_string(),
                status,
            }),
        }
    }

    async fn start_run(&self, actor_id: &str, input: &Value) -> Result<ActorRun, HarvesterError> {
        let url = format!("{}/acts/{}/runs", self.config.base_url, actor_id);
        let response = self
            .http
            .post(&url)
            .query(&[("token", self.config.token.as_str())])
            .json(input)
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HarvesterError::ActorStart {
                actor_id: actor_id.to_string(),
                body,
            });
        }

        let envelope: RunEnvelope = response.json().await?;
        Ok(envelope.data)
    }

    async fn run_status(&self, run_id: &str) -> Result<ActorRun, HarvesterError> {
        let url = format!("{}/actor-runs/{}", self.config.base_url, run_id);
        let envelope: RunEnvelope = self
            .http
            .get(&url)
            .query(&[("token", self.config.token.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.data)
    }

    async fn dataset_items<T: DeserializeOwned>(
        &self,
        dataset_id: &str,
    ) -> Result<Vec<T>, HarvesterError> {
        let url = format!("{}/datasets/{}/items", self.config.base_url, dataset_id);
        let items = self
            .http
            .get(&url)
            .query(&[("token", self.config.token.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(items)
    }
}
