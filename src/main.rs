use anyhow::Context;
use clap::Parser;
use log::{LevelFilter, info};
use redlanes::app::{self, App};
use redlanes::config::Cli;
use redlanes::fetch::{FeedFetcher, FeedSource, HttpFeedSource};
use redlanes::listing::ListingParser;
use redlanes::logging::setup_logger;
use redlanes::manager::LaneManager;
use redlanes::storage::LaneStore;
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_path();
    setup_logger(&log_path, LevelFilter::from(cli.log_level))
        .with_context(|| format!("could not open log file {}", log_path.display()))?;
    info!("redlanes starting, host {}", cli.host);

    let store = LaneStore::new(cli.open_store().context("could not locate the lane store")?);

    let source: Arc<dyn FeedSource> = Arc::new(HttpFeedSource::new()?);
    let mut parser = ListingParser::new();
    if let Some(limit) = cli.max_posts {
        parser = parser.with_post_limit(limit);
    }
    let fetcher = FeedFetcher::new(&cli.host, source)
        .with_context(|| format!("invalid host {}", cli.host))?
        .with_parser(parser);

    let (tx, rx) = mpsc::unbounded_channel();
    let manager = LaneManager::new(store, Arc::new(fetcher), tx);

    // Start the UI; lanes begin loading as soon as the app is built
    app::start_ui(App::new(manager), rx).await
}
