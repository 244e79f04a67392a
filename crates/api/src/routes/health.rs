//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use recipe_store::RecipeStore;
use serde::Serialize;

use crate::error::ApiError;
use crate::routes::recipes::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub recipes: usize,
}

/// GET /health — returns service status and the number of stored recipes.
pub async fn check<S: RecipeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let recipes = state.store.count().await?;
    Ok(Json(HealthResponse {
        status: "ok",
        recipes,
    }))
}
