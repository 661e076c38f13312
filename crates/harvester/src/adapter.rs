use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::actor::ActorClient;
use crate::error::HarvesterError;
use crate::item::{NormalizedItem, Platform};
use crate::normalize::{MappingTable, normalize};

/// Shared plumbing for the actor-backed platform adapters.
#[derive(Clone)]
pub struct Adapter {
    pub platform: Platform,
    pub actor_id: &'static str,
    pub client: Arc<ActorClient>,
}

impl Adapter {
    pub fn new(platform: Platform, actor_id: &'static str, client: Arc<ActorClient>) -> Self {
        Self {
            platform,
            actor_id,
            client,
        }
    }
}

/// One adapter per surface: canonicalize the caller's loose identifier into
/// the actor's input, run the job, normalize whatever raw shape comes back.
///
/// Adapters never retry; job-runner errors propagate unchanged to the caller.
#[async_trait]
pub trait PlatformAdapter: Send + Sync {
    fn adapter(&self) -> &Adapter;

    fn platform(&self) -> Platform {
        self.adapter().platform
    }

    /// Declarative raw-key to record-field mapping for this platform.
    fn mapping(&self) -> &'static MappingTable;

    /// Turn a loose identifier (full URL, bare id, numeric id) into the
    /// actor's input payload.
    fn build_input(&self, target: &str, max_items: u32) -> Result<Value, HarvesterError>;

    async fn fetch(
        &self,
        target: &str,
        max_items: u32,
    ) -> Result<Vec<NormalizedItem>, HarvesterError> {
        let adapter = self.adapter();
        let input = self.build_input(target, max_items)?;
        debug!(
            platform = %adapter.platform,
            actor_id = adapter.actor_id,
            "submitting actor job"
        );
        let raw: Vec<Value> = adapter.client.run_actor(adapter.actor_id, &input).await?;
        Ok(raw
            .iter()
            .map(|item| normalize(adapter.platform, self.mapping(), item))
            .collect())
    }
}
