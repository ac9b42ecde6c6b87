//! Liveness endpoint.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::SharedState;

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<Value> {
    let genes = state.genes.snapshot().await;
    let drugs = state.drugs.snapshot().await;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "genes_loaded": genes.len(),
        "drugs_loaded": drugs.len(),
    }))
}
