//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use resolver::{
    BrowserRuntime, RenderedExtractor, RenderedExtractorConfig, ResolutionPolicy, Resolver,
    StaticExtractor,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::routes::{getlink_handler, health_handler, stream_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The resolution engine
    pub resolver: Arc<Resolver>,

    /// Client for the upstream byte relay. Bounded connect timeout,
    /// no overall deadline: relay duration is caller-driven.
    pub http: reqwest::Client,
}

impl AppState {
    /// Assemble state around a resolver.
    pub fn new(resolver: Resolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
            http: reqwest::Client::builder()
                .connect_timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

/// Wire the production resolver from policy and probed browser runtime.
pub fn build_resolver(policy: ResolutionPolicy, runtime: BrowserRuntime) -> Resolver {
    let rendered = RenderedExtractor::new(RenderedExtractorConfig {
        runtime,
        ..Default::default()
    });

    Resolver::new(
        Arc::new(StaticExtractor::default()),
        Arc::new(rendered),
    )
    .with_policy(policy)
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/getlink", get(getlink_handler))
        .route("/stream", get(stream_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
