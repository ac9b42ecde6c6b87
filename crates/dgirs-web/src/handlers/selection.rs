//! Selection endpoints. Each one forwards to the dashboard update loop and
//! returns the resulting view.

use axum::{extract::State, Json};
use dgirs_client::SearchMode;
use dgirs_common::ApiError;
use serde::Deserialize;

use crate::session::{DashboardView, SelectionEvent};
use crate::state::SharedState;

/// `{"genes": [...], "mode": "drugs"}`. `genes` holds drug names in drugs
/// mode; `mode` defaults to genes.
#[derive(Debug, Deserialize)]
pub struct GenesSelection {
    #[serde(default)]
    pub genes: Vec<String>,
    #[serde(default)]
    pub mode: SearchMode,
}

/// `{"id": null}` clears the selection.
#[derive(Debug, Deserialize)]
pub struct IdSelection {
    pub id: Option<String>,
}

/// GET /api/view
pub async fn api_view(State(state): State<SharedState>) -> Result<Json<DashboardView>, ApiError> {
    Ok(Json(state.dashboard.view().await?))
}

/// POST /api/selection/genes
pub async fn api_select_genes(
    State(state): State<SharedState>,
    Json(body): Json<GenesSelection>,
) -> Result<Json<DashboardView>, ApiError> {
    let event = SelectionEvent::SelectGenes { terms: body.genes, mode: body.mode };
    let view = state.dashboard.send(event).await?;
    Ok(Json(view))
}

/// POST /api/selection/node
pub async fn api_select_node(
    State(state): State<SharedState>,
    Json(body): Json<IdSelection>,
) -> Result<Json<DashboardView>, ApiError> {
    let view = state.dashboard.send(SelectionEvent::SelectNode(body.id)).await?;
    Ok(Json(view))
}

/// POST /api/selection/neighbor
pub async fn api_select_neighbor(
    State(state): State<SharedState>,
    Json(body): Json<IdSelection>,
) -> Result<Json<DashboardView>, ApiError> {
    let view = state.dashboard.send(SelectionEvent::SelectNeighbor(body.id)).await?;
    Ok(Json(view))
}

/// POST /api/selection/edge
pub async fn api_select_edge(
    State(state): State<SharedState>,
    Json(body): Json<IdSelection>,
) -> Result<Json<DashboardView>, ApiError> {
    let view = state.dashboard.send(SelectionEvent::SelectEdge(body.id)).await?;
    Ok(Json(view))
}
