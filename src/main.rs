mod config;
mod models;
mod routes;
mod services;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::{
    categorizer::CategoryRules, discovery::FallbackDiscoverer, fetcher::SourceFetcher,
    refresh::RefreshScheduler, registry::ChannelRegistry,
};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub registry: Arc<ChannelRegistry>,
    /// Client for relay streams: connection setup is bounded, but there is no
    /// total-duration timeout since live streams run indefinitely.
    pub relay_client: reqwest::Client,
    pub start_time: Instant,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daddyhub_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    let port = config.port;

    tracing::info!("Starting DaddyHub Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Configured sources: {}", config.sources.len());

    // Channel registry, initially empty until the first refresh completes
    let registry = Arc::new(ChannelRegistry::new());

    // Fetch plumbing shared by the scheduler and the fallback discoverer
    let fetcher = SourceFetcher::new(&config.user_agent, config.fetch_timeout_ms);
    let discoverer = FallbackDiscoverer::new(
        fetcher.clone(),
        config.fallback_index_url.clone(),
        config.fallback_max_sources,
    );

    // Start the background refresh loop
    let scheduler = RefreshScheduler::new(
        fetcher,
        discoverer,
        config.sources.clone(),
        CategoryRules::default(),
        config.refresh_interval_secs,
    );
    tokio::spawn(scheduler.run(registry.clone()));
    tracing::info!(
        "Refresh task started (every {}s)",
        config.refresh_interval_secs
    );

    // Relay client: bounded connection setup, unbounded stream duration
    let relay_client = reqwest::Client::builder()
        .connect_timeout(Duration::from_millis(config.relay_connect_timeout_ms))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?;

    // Build application state
    let state = Arc::new(AppState {
        config,
        registry,
        relay_client,
        start_time: Instant::now(),
    });

    // Build router
    let app = Router::new()
        // Status endpoints
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        // Playlist endpoints
        .route("/playlist.m3u", get(routes::playlist::playlist))
        .route("/epg.xml", get(routes::playlist::epg))
        .route("/ui", get(routes::playlist::ui))
        // Stream relay
        .route("/stream/:id", get(routes::relay::relay_stream))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
