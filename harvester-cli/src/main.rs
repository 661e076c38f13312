//! Command-line front end for the harvester library.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use platform_harvester::platforms::hackernews::{HackerNewsClient, HnSearchQuery, HnTag};
use platform_harvester::platforms::reddit::{
    RedditAdapter, RedditOrchestrator, RedditOutcome, RedditPrimaryClient, RedditSort,
};
use platform_harvester::resilience::Resilience;
use platform_harvester::{ActorClient, AdapterRegistry, Platform};

#[derive(Parser)]
#[command(name = "harvester", version, about = "Harvest consumer feedback from review platforms, Reddit, and Hacker News")]
struct Args {
    /// Log verbosity, e.g. `info` or `platform_harvester=debug`.
    #[arg(long, default_value = "info", global = true)]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run an actor-backed fetch for one platform.
    Fetch {
        /// Platform key, e.g. `google`, `trustpilot`, `amazon`.
        platform: Platform,
        /// Platform-specific target: a URL, slug, ASIN, app id, and so on.
        target: String,
        #[arg(long, default_value_t = 50)]
        max_items: u32,
    },
    /// Fetch a subreddit listing, primary API first with actor fallback.
    Reddit {
        subreddit: String,
        #[arg(long, default_value = "hot")]
        sort: RedditSort,
        #[arg(long, default_value_t = 25)]
        limit: u32,
    },
    /// Search Hacker News; multiple keywords merge into one OR query.
    Hn {
        #[arg(required = true)]
        keywords: Vec<String>,
        /// Restrict to a tag: story, comment, ask_hn, show_hn, front_page.
        #[arg(long)]
        tag: Option<HnTag>,
        /// Only items created within the last N hours.
        #[arg(long)]
        window_hours: Option<u64>,
        /// Sort chronologically instead of by relevance.
        #[arg(long)]
        newest: bool,
        #[arg(long, default_value_t = 50)]
        hits: u32,
    },
    /// Print per-platform breaker and rate-limit health.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log)),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Fetch {
            platform,
            target,
            max_items,
        } => {
            let client = Arc::new(ActorClient::from_env()?);
            let registry = AdapterRegistry::with_defaults(client);
            let Some(adapter) = registry.get(platform) else {
                bail!("no actor-backed adapter for `{platform}`; use the `reddit` or `hn` subcommand");
            };
            let items = adapter
                .fetch(&target, max_items)
                .await
                .with_context(|| format!("fetching {platform} items for `{target}`"))?;
            info!(platform = %platform, count = items.len(), "fetch finished");
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        Command::Reddit {
            subreddit,
            sort,
            limit,
        } => {
            let resilience = Arc::new(Resilience::default());
            let primary = RedditPrimaryClient::new()?;
            // The fallback is optional: without a token the primary path
            // still works on its own.
            let fallback = ActorClient::from_env()
                .ok()
                .map(|client| RedditAdapter::new(Arc::new(client)));
            if fallback.is_none() {
                info!("no actor credentials found, running without a fallback path");
            }

            let orchestrator = RedditOrchestrator::new(primary, fallback, resilience);
            let outcome = orchestrator.fetch(&subreddit, sort, limit).await;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if let RedditOutcome::BothFailed { .. } = outcome {
                bail!("both the primary API and the fallback path failed");
            }
        }
        Command::Hn {
            keywords,
            tag,
            window_hours,
            newest,
            hits,
        } => {
            let mut query = HnSearchQuery::new(keywords);
            if let Some(tag) = tag {
                query = query.tag(tag);
            }
            if let Some(hours) = window_hours {
                query = query.within_hours(hours);
            }
            if newest {
                query = query.newest_first();
            }
            query.hits_per_page = Some(hits);

            let items = HackerNewsClient::new()?
                .search(&query)
                .await
                .context("searching hacker news")?;
            info!(count = items.len(), "search finished");
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        Command::Health => {
            // A fresh process has no traffic yet; this surfaces the empty
            // baseline so operators can confirm wiring and output shape.
            let resilience = Resilience::default();
            let health = resilience.health_map();
            println!("{}", serde_json::to_string_pretty(&health)?);
        }
    }

    Ok(())
}
