//! Per-platform adapters and the registry that owns them.

pub mod amazon;
pub mod app_store;
pub mod g2;
pub mod google;
pub mod hackernews;
pub mod play_store;
pub mod quora;
pub mod reddit;
pub mod trustpilot;
pub mod yelp;
pub mod youtube;

pub use amazon::AmazonAdapter;
pub use app_store::AppStoreAdapter;
pub use g2::G2Adapter;
pub use google::GoogleReviewsAdapter;
pub use hackernews::{HackerNewsClient, HnOrder, HnSearchQuery, HnTag};
pub use play_store::PlayStoreAdapter;
pub use quora::QuoraAdapter;
pub use reddit::{RedditAdapter, RedditOrchestrator, RedditOutcome, RedditPrimaryClient, RedditSort};
pub use trustpilot::TrustpilotAdapter;
pub use yelp::YelpAdapter;
pub use youtube::YouTubeAdapter;

use std::sync::Arc;

use crate::actor::ActorClient;
use crate::adapter::PlatformAdapter;
use crate::item::Platform;

/// Holds one adapter per actor-backed platform, resolved by platform key.
///
/// Reddit's primary path and Hacker News are not registered here; they have
/// dedicated clients because they do not run through actor jobs.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn PlatformAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in actor-backed adapter installed.
    pub fn with_defaults(client: Arc<ActorClient>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(GoogleReviewsAdapter::new(client.clone())));
        registry.register(Arc::new(TrustpilotAdapter::new(client.clone())));
        registry.register(Arc::new(AppStoreAdapter::new(client.clone())));
        registry.register(Arc::new(PlayStoreAdapter::new(client.clone())));
        registry.register(Arc::new(QuoraAdapter::new(client.clone())));
        registry.register(Arc::new(YouTubeAdapter::new(client.clone())));
        registry.register(Arc::new(G2Adapter::new(client.clone())));
        registry.register(Arc::new(YelpAdapter::new(client.clone())));
        registry.register(Arc::new(AmazonAdapter::new(client.clone())));
        registry.register(Arc::new(RedditAdapter::new(client)));
        registry
    }

    /// Later registrations for the same platform shadow earlier ones.
    pub fn register(&mut self, adapter: Arc<dyn PlatformAdapter>) {
        self.adapters.insert(0, adapter);
    }

    pub fn get(&self, platform: Platform) -> Option<Arc<dyn PlatformAdapter>> {
        self.adapters
            .iter()
            .find(|a| a.platform() == platform)
            .cloned()
    }

    pub fn platforms(&self) -> Vec<Platform> {
        let mut seen = Vec::new();
        for adapter in &self.adapters {
            if !seen.contains(&adapter.platform()) {
                seen.push(adapter.platform());
            }
        }
        seen
    }
}
