use std::sync::Arc;

use crate::llm_client::LlmGateway;
use crate::recommendations::generator::GenerationSettings;
use crate::repository::Repositories;
use crate::trends::service::TrendService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres-backed in production, in-memory demo store otherwise.
    pub repos: Repositories,
    pub llm: LlmGateway,
    /// Process-wide trend cache; one refresh in flight at a time.
    pub trends: Arc<TrendService>,
    pub generation: GenerationSettings,
}
