//! HTTP API server for the recipe service.
//!
//! Provides REST endpoints for recipe management over a JSON-file backed
//! store, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusHandle;
use recipe_store::{JsonFilePersistence, JsonRecipeStore, RecipeStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::recipes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: RecipeStore + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/health", get(routes::health::check::<S>))
        .route("/metrics", get(routes::metrics::get::<S>))
        .route(
            "/recipes",
            get(routes::recipes::list::<S>).post(routes::recipes::create::<S>),
        )
        .route(
            "/recipes/{id}",
            get(routes::recipes::get::<S>)
                .put(routes::recipes::update::<S>)
                .delete(routes::recipes::delete::<S>),
        )
        .route("/random-recipe", get(routes::recipes::random::<S>))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates application state around an existing store.
pub fn create_state<S: RecipeStore>(
    store: S,
    metrics_handle: PrometheusHandle,
) -> Arc<AppState<S>> {
    Arc::new(AppState {
        store,
        metrics_handle,
    })
}

/// Opens the JSON recipe document named by `config` and wraps it in
/// application state.
///
/// A missing or unreadable document yields an empty collection.
pub async fn create_default_state(
    config: &Config,
    metrics_handle: PrometheusHandle,
) -> Arc<AppState<JsonRecipeStore>> {
    let persistence = JsonFilePersistence::new(&config.recipes_file);
    let store = JsonRecipeStore::open(persistence).await;
    create_state(store, metrics_handle)
}
