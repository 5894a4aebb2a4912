//! Router construction.

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Build the API router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::landing::landing_handler))
        .route(
            "/collections",
            get(handlers::collections::list_collections_handler),
        )
        .route(
            "/collections/:collection_id",
            get(handlers::collections::get_collection_handler),
        )
        .route(
            "/collections/:collection_id/items/:item_id",
            get(handlers::items::get_item_handler),
        )
        .route(
            "/profiles/:resource_kind",
            get(handlers::profiles::profiles_handler),
        )
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
