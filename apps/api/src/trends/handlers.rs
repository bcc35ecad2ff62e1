use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::trend::TrendRecord;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TrendsQuery {
    #[serde(default)]
    pub force_refresh: bool,
}

#[derive(Serialize)]
pub struct TrendsResponse {
    pub trends: Vec<TrendRecord>,
    pub fetched_at: DateTime<Utc>,
    pub from_fallback: bool,
}

/// GET /api/v1/trends
pub async fn handle_list_trends(
    State(state): State<AppState>,
    Query(params): Query<TrendsQuery>,
) -> Result<Json<TrendsResponse>, AppError> {
    let snapshot = state.trends.current(params.force_refresh).await;
    Ok(Json(TrendsResponse {
        trends: snapshot.trends.as_ref().clone(),
        fetched_at: snapshot.fetched_at,
        from_fallback: snapshot.from_fallback,
    }))
}
