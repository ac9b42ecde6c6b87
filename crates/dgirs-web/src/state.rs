//! Shared application state for the web server.

use dgirs_client::{DgidbClient, GeneListCache, InteractionSource, SearchMode};
use dgirs_common::{Config, Result};
use dgirs_graph::diff::DiffSummary;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::session::{start_dashboard_loop, DashboardHandle};

/// Events pushed to connected clients via SSE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// The term selection produced a new graph (or cleared it)
    GraphUpdated { mode: SearchMode, genes: Vec<String>, summary: DiffSummary },
    /// Node, neighbour or edge selection changed
    SelectionChanged {
        selected_node: Option<String>,
        selected_neighbor: Option<String>,
        selected_edge: Option<String>,
    },
    /// The DGIdb gene list was re-fetched
    GeneListRefreshed { count: usize },
    /// The DGIdb drug list was re-fetched
    DrugListRefreshed { count: usize },
    /// General notification
    Notification { level: String, message: String },
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub source: Arc<dyn InteractionSource>,
    pub genes: GeneListCache,
    pub drugs: GeneListCache,
    pub dashboard: DashboardHandle,
    /// Broadcast channel for SSE push events
    pub event_tx: broadcast::Sender<AppEvent>,
}

impl AppState {
    /// Must be called inside a Tokio runtime; the dashboard loop is spawned here.
    pub fn new(source: Arc<dyn InteractionSource>, genes: GeneListCache, drugs: GeneListCache) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        let dashboard = start_dashboard_loop(source.clone(), event_tx.clone());
        Self { source, genes, drugs, dashboard, event_tx }
    }

    /// Connect to DGIdb and fetch the initial gene and drug lists.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let client = DgidbClient::from_config(config)?;
        let source: Arc<dyn InteractionSource> = Arc::new(client);
        let (genes, drugs) = tokio::join!(
            GeneListCache::load(source.as_ref()),
            GeneListCache::load_drugs(source.as_ref()),
        );
        Ok(Self::new(source, genes, drugs))
    }

    /// The cached name list backing a search mode.
    pub fn names(&self, mode: SearchMode) -> &GeneListCache {
        match mode {
            SearchMode::Genes => &self.genes,
            SearchMode::Drugs => &self.drugs,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_tx.subscribe()
    }

    /// Broadcast to SSE subscribers; having none is not an error.
    pub fn publish(&self, event: AppEvent) {
        let _ = self.event_tx.send(event);
    }
}

pub type SharedState = Arc<AppState>;
