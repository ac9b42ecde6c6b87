//! Axum router — maps URL paths to handlers.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    dashboard::dashboard,
    genes::{api_drugs, api_drugs_refresh, api_genes, api_genes_refresh},
    selection::{api_select_edge, api_select_genes, api_select_neighbor, api_select_node, api_view},
    system::health,
};
use crate::sse::sse_handler;
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/", get(dashboard))
        .route("/health", get(health))

        // SSE streaming
        .route("/api/events", get(sse_handler))

        // API endpoints
        .route("/api/genes", get(api_genes))
        .route("/api/genes/refresh", post(api_genes_refresh))
        .route("/api/drugs", get(api_drugs))
        .route("/api/drugs/refresh", post(api_drugs_refresh))
        .route("/api/view", get(api_view))
        .route("/api/selection/genes", post(api_select_genes))
        .route("/api/selection/node", post(api_select_node))
        .route("/api/selection/neighbor", post(api_select_neighbor))
        .route("/api/selection/edge", post(api_select_edge))

        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(shared)
}
