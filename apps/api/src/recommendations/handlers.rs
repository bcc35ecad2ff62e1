use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::recommendation::Recommendation;
use crate::recommendations::generator::{
    generate_recommendations, GenerateRequest, GenerateResponse,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub user_id: Uuid,
    #[serde(default)]
    pub include_dismissed: bool,
}

#[derive(Deserialize)]
pub struct RecommendationUpdate {
    pub user_id: Uuid,
    pub acted_on: Option<bool>,
    pub dismissed: Option<bool>,
}

/// POST /api/v1/recommendations/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(req) = payload?;
    let response = generate_recommendations(
        &state.repos,
        &state.trends,
        &state.llm,
        state.generation,
        req,
    )
    .await?;
    Ok(Json(response))
}

/// GET /api/v1/recommendations
pub async fn handle_list(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Recommendation>>, AppError> {
    let Query(params) = query?;
    let recommendations = state
        .repos
        .recommendations
        .list(params.user_id, params.include_dismissed)
        .await?;
    Ok(Json(recommendations))
}

/// PATCH /api/v1/recommendations/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    payload: Result<Json<RecommendationUpdate>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(req) = payload?;
    if req.acted_on.is_none() && req.dismissed.is_none() {
        return Err(AppError::Validation(
            "Provide at least one of acted_on or dismissed".to_string(),
        ));
    }

    let updated = state
        .repos
        .recommendations
        .update_flags(req.user_id, id, req.acted_on, req.dismissed)
        .await?;

    if !updated {
        return Err(AppError::NotFound(format!("Recommendation {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
