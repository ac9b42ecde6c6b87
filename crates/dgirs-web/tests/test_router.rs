//! Serve the dashboard on an ephemeral port against a stub interaction
//! source and exercise every route over HTTP.

use async_trait::async_trait;
use axum::Router;
use dgirs_client::{
    Attributes, DrugListEntry, GeneList, GeneListCache, GeneListEntry, InteractionFilters,
    InteractionRecord, InteractionSource, SearchMode,
};
use dgirs_common::{DgiError, Result};
use dgirs_web::{router::build_router, state::AppState};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;

struct StubSource;

fn record(gene: &str, drug: &str) -> InteractionRecord {
    InteractionRecord {
        gene_name: gene.into(),
        gene_long_name: None,
        drug_name: drug.into(),
        approved: Some(true),
        interaction_score: Some(1.0),
        interaction_attributes: Attributes::new(),
        sources: vec!["DTC".into()],
        pmids: vec![42],
    }
}

#[async_trait]
impl InteractionSource for StubSource {
    async fn interactions(
        &self,
        terms: &[String],
        mode: SearchMode,
        _filters: &InteractionFilters,
    ) -> Result<Vec<InteractionRecord>> {
        if terms.iter().any(|t| t == "OFFLINE") {
            return Err(DgiError::UnexpectedResponse("missing genes.nodes".into()));
        }
        let rows = [
            record("BRAF", "IMATINIB"),
            record("ABL1", "IMATINIB"),
            record("BRAF", "DASATINIB"),
        ];
        Ok(rows
            .into_iter()
            .filter(|r| match mode {
                SearchMode::Genes => terms.contains(&r.gene_name),
                SearchMode::Drugs => terms.contains(&r.drug_name),
            })
            .collect())
    }

    async fn gene_list(&self) -> Result<Vec<GeneListEntry>> {
        Ok(["ABL1", "BRAF", "BRCA1", "KRAS"]
            .iter()
            .map(|name| GeneListEntry { name: name.to_string(), concept_id: format!("hgnc:{}", name) })
            .collect())
    }

    async fn drug_list(&self) -> Result<Vec<DrugListEntry>> {
        Ok(["DASATINIB", "IMATINIB", "IMIQUIMOD"]
            .iter()
            .map(|name| DrugListEntry { name: name.to_string(), concept_id: format!("ncit:{}", name) })
            .collect())
    }
}

/// Serve `router` on an ephemeral port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_app() -> String {
    let source: Arc<dyn InteractionSource> = Arc::new(StubSource);
    let genes = GeneListCache::load(source.as_ref()).await;
    let drugs = GeneListCache::load_drugs(source.as_ref()).await;
    serve(build_router(AppState::new(source, genes, drugs))).await
}

async fn send(base: &str, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let client = reqwest::Client::new();
    let url = format!("{}{}", base, path);
    let request = match method {
        "POST" => client.post(&url),
        _ => client.get(&url),
    };
    let request = match body {
        Some(body) => request.json(&body),
        None => request,
    };
    let response = request.send().await.unwrap();
    let status = response.status();
    let value = response.json().await.unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let base = spawn_app().await;
    let (status, body) = send(&base, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["genes_loaded"], 4);
    assert_eq!(body["drugs_loaded"], 3);
}

#[tokio::test]
async fn test_gene_list_prefix_filter() {
    let base = spawn_app().await;
    let (status, body) = send(&base, "GET", "/api/genes?q=br&limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 4);
    assert_eq!(body["genes"], json!(["BRAF", "BRCA1"]));
    assert!(body["loaded_at"].is_string());

    let (status, body) = send(&base, "POST", "/api/genes/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["genes"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_selection_flow() {
    let base = spawn_app().await;

    let (status, view) = send(
        &base,
        "POST",
        "/api/selection/genes",
        Some(json!({ "genes": ["BRAF", "ABL1"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["node_count"], 4);
    assert_eq!(view["edge_count"], 3);
    let groups: Vec<&str> = view["elements"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["classes"] == "group")
        .filter_map(|e| e["data"]["id"].as_str())
        .collect();
    assert_eq!(groups, vec!["Group: ABL1-BRAF", "Group: BRAF"]);

    let (status, view) = send(&base, "POST", "/api/selection/node", Some(json!({ "id": "BRAF" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["neighbor_options"], json!(["DASATINIB", "IMATINIB"]));

    let (status, view) = send(
        &base,
        "POST",
        "/api/selection/neighbor",
        Some(json!({ "id": "DASATINIB" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["selected_edge"], "BRAF - DASATINIB");
    assert!(view["edge_info"].as_str().unwrap().ends_with("Source: DTC\n\nPmid: 42"));

    let (status, view) = send(&base, "GET", "/api/view", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["selected_node"], "BRAF");

    let (status, view) = send(
        &base,
        "POST",
        "/api/selection/edge",
        Some(json!({ "id": "ABL1 - IMATINIB" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["selected_text"], "ABL1 - IMATINIB");
    assert!(view["selected_node"].is_null());
}

#[tokio::test]
async fn test_unknown_gene_renders_empty_state() {
    let base = spawn_app().await;
    let (status, view) = send(&base, "POST", "/api/selection/genes", Some(json!({ "genes": ["TP53"] }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["elements"], json!([]));
    assert_eq!(view["message"], "No interactions found for the selected genes.");
}

#[tokio::test]
async fn test_error_statuses() {
    let base = spawn_app().await;

    let (status, body) = send(&base, "POST", "/api/selection/node", Some(json!({ "id": "BRAF" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown node 'BRAF'");

    let (status, body) = send(&base, "POST", "/api/selection/genes", Some(json!({ "genes": ["OFFLINE"] }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().starts_with("upstream request failed"));
}

#[tokio::test]
async fn test_dashboard_page() {
    let base = spawn_app().await;
    let response = reqwest::get(format!("{}/", base)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = response.text().await.unwrap();
    assert!(html.contains(r#"<option value="BRCA1">"#));
    assert!(html.contains("Add a gene (4 known)"));
    assert!(html.contains(r#"<option value="IMIQUIMOD">"#));
    assert!(html.contains(r#"data-drug-count="3""#));
}

#[tokio::test]
async fn test_empty_cache_still_serves() {
    let source: Arc<dyn InteractionSource> = Arc::new(StubSource);
    let empty = || GeneListCache::new(GeneList::empty());
    let base = serve(build_router(AppState::new(source, empty(), empty()))).await;
    let (status, body) = send(&base, "GET", "/api/genes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
    assert!(body["loaded_at"].is_null());
}

#[tokio::test]
async fn test_drug_list_prefix_filter() {
    let base = spawn_app().await;
    let (status, body) = send(&base, "GET", "/api/drugs?q=imi", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["drugs"], json!(["IMIQUIMOD"]));

    let (status, body) = send(&base, "POST", "/api/drugs/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drugs"], json!(["DASATINIB", "IMATINIB", "IMIQUIMOD"]));
}

#[tokio::test]
async fn test_drug_search_mode() {
    let base = spawn_app().await;

    let (status, view) = send(
        &base,
        "POST",
        "/api/selection/genes",
        Some(json!({ "genes": ["imatinib"], "mode": "drugs" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["mode"], "drugs");
    assert_eq!(view["genes"], json!(["IMATINIB"]));
    assert_eq!(view["node_count"], 3);
    assert_eq!(view["edge_count"], 2);

    let genes: Vec<&str> = view["elements"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|e| e["data"]["kind"] == "gene")
        .map(|e| e["classes"].as_str().unwrap())
        .collect();
    assert_eq!(genes, vec!["gene single-degree", "gene single-degree"]);

    let (status, view) = send(&base, "POST", "/api/selection/node", Some(json!({ "id": "IMATINIB" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["neighbor_options"], json!(["ABL1", "BRAF"]));

    let (_, view) = send(
        &base,
        "POST",
        "/api/selection/genes",
        Some(json!({ "genes": ["ASPIRIN"], "mode": "drugs" })),
    )
    .await;
    assert_eq!(view["message"], "No interactions found for the selected drugs.");

    // Omitting the mode searches by gene again.
    let (_, view) = send(&base, "POST", "/api/selection/genes", Some(json!({ "genes": ["BRAF"] }))).await;
    assert_eq!(view["mode"], "genes");
    assert_eq!(view["edge_count"], 2);

    let (status, _) = send(
        &base,
        "POST",
        "/api/selection/genes",
        Some(json!({ "genes": ["BRAF"], "mode": "proteins" })),
    )
    .await;
    assert!(status.is_client_error());
}
