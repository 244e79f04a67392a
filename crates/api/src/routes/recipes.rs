//! Recipe CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use metrics_exporter_prometheus::PrometheusHandle;
use recipe_store::{
    NewRecipe, Recipe, RecipeId, RecipePatch, RecipeQuery, RecipeStore, RecipeStoreExt,
};
use serde::Deserialize;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: RecipeStore> {
    pub store: S,
    pub metrics_handle: PrometheusHandle,
}

// -- Request types --

/// Query string accepted by `GET /recipes`.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Substring to find in the name or any ingredient item.
    pub search: Option<String>,
    /// Substring to find in any ingredient item.
    pub ingredient: Option<String>,
}

impl From<ListParams> for RecipeQuery {
    fn from(params: ListParams) -> Self {
        let mut query = RecipeQuery::new();
        if let Some(text) = params.search {
            query = query.text(text);
        }
        if let Some(ingredient) = params.ingredient {
            query = query.ingredient(ingredient);
        }
        query
    }
}

// -- Handlers --

/// POST /recipes — create a recipe; the server assigns its id.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: RecipeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<NewRecipe>,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let recipe = state.store.create(req).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// GET /recipes — list all recipes, optionally filtered by `search` and
/// `ingredient`.
#[tracing::instrument(skip(state))]
pub async fn list<S: RecipeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let query = RecipeQuery::from(params);
    let recipes = state.store.search(&query).await?;
    Ok(Json(recipes))
}

/// GET /recipes/:id — fetch a single recipe.
#[tracing::instrument(skip(state))]
pub async fn get<S: RecipeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = state
        .store
        .get(&RecipeId::from(id.as_str()))
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Recipe {id} not found")))?;
    Ok(Json(recipe))
}

/// PUT /recipes/:id — merge the provided fields into a recipe.
#[tracing::instrument(skip(state, patch))]
pub async fn update<S: RecipeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(patch): Json<RecipePatch>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = state.store.update(&RecipeId::from(id), patch).await?;
    Ok(Json(recipe))
}

/// DELETE /recipes/:id — remove a recipe and return it.
#[tracing::instrument(skip(state))]
pub async fn delete<S: RecipeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = state.store.delete(&RecipeId::from(id)).await?;
    Ok(Json(recipe))
}

/// GET /random-recipe — one recipe chosen uniformly at random, or `null`
/// when there are none.
#[tracing::instrument(skip(state))]
pub async fn random<S: RecipeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Option<Recipe>>, ApiError> {
    let recipe = state.store.random_recipe().await?;
    Ok(Json(recipe))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_build_query() {
        let params = ListParams {
            search: Some("Marg".to_string()),
            ingredient: None,
        };
        let query = RecipeQuery::from(params);
        assert_eq!(query.text.as_deref(), Some("marg"));
        assert!(query.ingredient.is_none());
    }

    #[test]
    fn empty_list_params_match_everything() {
        let query = RecipeQuery::from(ListParams::default());
        assert!(query.is_empty());
    }
}
