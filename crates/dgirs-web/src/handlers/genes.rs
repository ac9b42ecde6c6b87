//! Gene and drug list endpoints backing the term picker.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use dgirs_client::{GeneList, SearchMode};
use dgirs_common::ApiError;
use serde::{Deserialize, Serialize};

use crate::state::{AppEvent, SharedState};

#[derive(Debug, Deserialize, Default)]
pub struct GeneFilter {
    /// Case-insensitive name prefix.
    pub q: Option<String>,
    pub limit: Option<usize>,
}

impl GeneFilter {
    fn apply(&self, list: &GeneList) -> Vec<String> {
        let prefix = self.q.as_deref().unwrap_or("").to_uppercase();
        list.names()
            .filter(|name| name.to_uppercase().starts_with(&prefix))
            .take(self.limit.unwrap_or(usize::MAX))
            .map(String::from)
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct ApiGeneList {
    pub total: usize,
    pub loaded_at: Option<String>,
    pub genes: Vec<String>,
}

impl ApiGeneList {
    fn from_list(list: &GeneList, filter: &GeneFilter) -> Self {
        Self {
            total: list.len(),
            loaded_at: list.loaded_at.map(|t| t.to_rfc3339()),
            genes: filter.apply(list),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiDrugList {
    pub total: usize,
    pub loaded_at: Option<String>,
    pub drugs: Vec<String>,
}

impl ApiDrugList {
    fn from_list(list: &GeneList, filter: &GeneFilter) -> Self {
        Self {
            total: list.len(),
            loaded_at: list.loaded_at.map(|t| t.to_rfc3339()),
            drugs: filter.apply(list),
        }
    }
}

/// GET /api/genes - Cached gene names
pub async fn api_genes(
    State(state): State<SharedState>,
    Query(filter): Query<GeneFilter>,
) -> Json<ApiGeneList> {
    let list = state.names(SearchMode::Genes).snapshot().await;
    Json(ApiGeneList::from_list(&list, &filter))
}

/// POST /api/genes/refresh - Re-fetch the gene list from DGIdb
pub async fn api_genes_refresh(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let list = state.genes.refresh(state.source.as_ref()).await?;
    state.publish(AppEvent::GeneListRefreshed { count: list.len() });
    Ok(Json(ApiGeneList::from_list(&list, &GeneFilter::default())))
}

/// GET /api/drugs - Cached drug names
pub async fn api_drugs(
    State(state): State<SharedState>,
    Query(filter): Query<GeneFilter>,
) -> Json<ApiDrugList> {
    let list = state.names(SearchMode::Drugs).snapshot().await;
    Json(ApiDrugList::from_list(&list, &filter))
}

/// POST /api/drugs/refresh - Re-fetch the drug list from DGIdb
pub async fn api_drugs_refresh(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let list = state.drugs.refresh(state.source.as_ref()).await?;
    state.publish(AppEvent::DrugListRefreshed { count: list.len() });
    Ok(Json(ApiDrugList::from_list(&list, &GeneFilter::default())))
}
