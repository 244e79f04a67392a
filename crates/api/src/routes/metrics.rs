//! Prometheus metrics endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use recipe_store::RecipeStore;

use crate::error::ApiError;
use crate::routes::recipes::AppState;

/// GET /metrics — returns Prometheus-formatted metrics.
///
/// The `recipes_stored` gauge is refreshed from the store on every scrape.
pub async fn get<S: RecipeStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = state.store.count().await?;
    ::metrics::gauge!("recipes_stored").set(stored as f64);

    Ok((
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.metrics_handle.render(),
    ))
}
