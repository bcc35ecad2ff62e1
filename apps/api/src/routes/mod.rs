pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::recommendations::handlers as recommendations;
use crate::state::AppState;
use crate::trends::handlers as trends;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Recommendations
        .route(
            "/api/v1/recommendations",
            get(recommendations::handle_list),
        )
        .route(
            "/api/v1/recommendations/generate",
            post(recommendations::handle_generate),
        )
        .route(
            "/api/v1/recommendations/:id",
            patch(recommendations::handle_update),
        )
        // Trends
        .route("/api/v1/trends", get(trends::handle_list_trends))
        .with_state(state)
}
