mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod recommendations;
mod repository;
mod routes;
mod state;
mod trends;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::anthropic::AnthropicProvider;
use crate::llm_client::openai::OpenAiProvider;
use crate::llm_client::LlmGateway;
use crate::models::user::ProviderKind;
use crate::recommendations::generator::GenerationSettings;
use crate::repository::memory::{MemoryStore, DEMO_USER_ID};
use crate::repository::postgres::PgStore;
use crate::repository::Repositories;
use crate::routes::build_router;
use crate::state::AppState;
use crate::trends::service::TrendService;
use crate::trends::source::TwitterTrendSource;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Lifeboard API v{}", env!("CARGO_PKG_VERSION"));

    // Storage: Postgres when configured, otherwise an in-memory demo store
    let repos = match config.database_url.as_deref() {
        Some(url) => {
            let pool = create_pool(url).await?;
            info!("PostgreSQL pool initialized");
            Repositories::from_store(Arc::new(PgStore::new(pool)))
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory store with demo user {DEMO_USER_ID}");
            Repositories::from_store(Arc::new(MemoryStore::with_demo_data().await))
        }
    };

    // LLM providers
    let llm = build_gateway(&config)?;

    // Trends
    if config.twitter_bearer_token.is_none() {
        warn!("TWITTER_BEARER_TOKEN not set; trends will use the curated fallback list");
    }
    let source = TwitterTrendSource::new(config.twitter_bearer_token.clone(), config.twitter_woeid)?;
    let trends = Arc::new(TrendService::new(
        Arc::new(source),
        repos.trends.clone(),
        Duration::from_secs(config.trend_cache_ttl_secs),
    ));
    info!("Trend cache TTL: {}s", config.trend_cache_ttl_secs);

    let state = AppState {
        repos,
        llm,
        trends,
        generation: GenerationSettings {
            max_tokens: config.llm_max_tokens,
            temperature: config.llm_temperature,
        },
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Registers a provider for every API key present.
fn build_gateway(config: &Config) -> Result<LlmGateway> {
    let timeout = Duration::from_secs(config.llm_timeout_secs);
    let mut llm = LlmGateway::new();

    if let Some(key) = &config.anthropic_api_key {
        llm = llm.with_provider(
            ProviderKind::Anthropic,
            Arc::new(AnthropicProvider::new(key.clone(), timeout)?),
        );
        info!("Anthropic provider initialized");
    }
    if let Some(key) = &config.openai_api_key {
        llm = llm.with_provider(
            ProviderKind::OpenAi,
            Arc::new(OpenAiProvider::new(key.clone(), timeout)?),
        );
        info!("OpenAI provider initialized");
    }
    if !llm.is_configured(ProviderKind::Anthropic) && !llm.is_configured(ProviderKind::OpenAi) {
        warn!("No LLM API keys configured; generation requests will fail");
    }

    Ok(llm)
}
