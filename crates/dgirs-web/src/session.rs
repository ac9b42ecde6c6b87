//! Dashboard update loop.
//!
//! Every selection made in the browser is sent to a single worker task over
//! an mpsc channel and applied in arrival order. The worker rebuilds the
//! graph when the term selection or search mode changes, diffs it against
//! the previous one and broadcasts the outcome to SSE subscribers. Callers get the resulting
//! [`DashboardView`] back over a oneshot channel.

use anyhow::anyhow;
use dgirs_client::{InteractionFilters, InteractionSource, SearchMode};
use dgirs_common::{DgiError, Result};
use dgirs_graph::{
    build_graph_with_mode, diff_graphs, to_elements, Edge, Element, GraphDiff, GraphError,
    InteractionGraph,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::state::AppEvent;

pub const NO_NODE_SELECTED: &str = "No Node Selected";
pub const NO_EDGE_SELECTED: &str = "No Edge Selected";
pub const NO_INTERACTIONS: &str = "No interactions found for the selected genes.";
pub const NO_DRUG_INTERACTIONS: &str = "No interactions found for the selected drugs.";

/// A user action on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    /// Search by `terms`, read as genes or drugs per `mode`.
    SelectGenes { terms: Vec<String>, mode: SearchMode },
    SelectNode(Option<String>),
    SelectNeighbor(Option<String>),
    SelectEdge(Option<String>),
    /// Read the current view without changing anything.
    View,
}

/// Everything the page needs to render the current state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub mode: SearchMode,
    /// Selected search terms; drug names in drugs mode.
    pub genes: Vec<String>,
    pub elements: Vec<Element>,
    pub node_count: usize,
    pub edge_count: usize,
    pub selected_node: Option<String>,
    pub selected_text: String,
    pub neighbor_options: Vec<String>,
    pub selected_neighbor: Option<String>,
    pub selected_edge: Option<String>,
    pub edge_info: String,
    /// Empty-state message shown in place of the graph.
    pub message: Option<String>,
}

/// Dashboard selection state. Owned by the update loop.
#[derive(Debug, Default)]
pub struct Session {
    mode: SearchMode,
    genes: Vec<String>,
    graph: Option<InteractionGraph>,
    selected_node: Option<String>,
    selected_neighbor: Option<String>,
    selected_edge: Option<String>,
    message: Option<String>,
}

impl Session {
    pub fn graph(&self) -> Option<&InteractionGraph> {
        self.graph.as_ref()
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Replace the gene selection and rebuild the graph.
    pub async fn select_genes(
        &mut self,
        genes: Vec<String>,
        source: &dyn InteractionSource,
    ) -> Result<GraphDiff> {
        self.select_terms(SearchMode::Genes, genes, source).await
    }

    /// Replace the search mode and terms, then rebuild the graph.
    ///
    /// On failure the previous state is kept.
    pub async fn select_terms(
        &mut self,
        mode: SearchMode,
        terms: Vec<String>,
        source: &dyn InteractionSource,
    ) -> Result<GraphDiff> {
        let terms = clean_terms(terms);
        let mut message = None;

        let next = if terms.is_empty() {
            None
        } else {
            let rows = source
                .interactions(&terms, mode, &InteractionFilters::default())
                .await?;
            match build_graph_with_mode(mode, &terms, &rows) {
                Ok(graph) => Some(graph),
                Err(GraphError::EmptyInput) => {
                    message = Some(empty_message(mode).to_string());
                    None
                }
                Err(e) => return Err(DgiError::UnexpectedResponse(e.to_string())),
            }
        };

        let diff = diff_graphs(self.graph.as_ref(), next.as_ref());
        self.mode = mode;
        self.genes = terms;
        self.graph = next;
        self.message = message;
        self.selected_node = None;
        self.selected_neighbor = None;
        self.selected_edge = None;
        Ok(diff)
    }

    pub fn select_node(&mut self, id: Option<String>) -> Result<()> {
        if let Some(id) = &id {
            self.require_node(id)?;
        }
        self.selected_node = id;
        self.selected_neighbor = None;
        self.selected_edge = None;
        Ok(())
    }

    /// Pick one of the selected node's neighbours. When the two differ in
    /// kind the connecting edge becomes the selected edge; otherwise the
    /// edge selection is left alone.
    pub fn select_neighbor(&mut self, id: Option<String>) -> Result<()> {
        let Some(neighbor) = id else {
            self.selected_neighbor = None;
            self.selected_edge = None;
            return Ok(());
        };
        let (graph, node) = match (&self.graph, &self.selected_node) {
            (Some(graph), Some(node)) => (graph, node),
            _ => return Err(DgiError::InvalidInput("no node is selected".into())),
        };
        if !graph.neighbors(node).contains(neighbor.as_str()) {
            return Err(DgiError::InvalidInput(format!(
                "'{}' is not a neighbour of '{}'",
                neighbor, node
            )));
        }

        let same_kind = graph
            .node(node)
            .zip(graph.node(&neighbor))
            .is_some_and(|(a, b)| a.kind == b.kind);
        if !same_kind {
            if let Some(edge) = graph.edges_between(node, &neighbor).first() {
                self.selected_edge = Some(edge.id.clone());
            }
        }
        self.selected_neighbor = Some(neighbor);
        Ok(())
    }

    pub fn select_edge(&mut self, id: Option<String>) -> Result<()> {
        if let Some(id) = &id {
            let known = self.graph.as_ref().is_some_and(|g| g.edge(id).is_some());
            if !known {
                return Err(DgiError::InvalidInput(format!("unknown edge '{}'", id)));
            }
        }
        self.selected_node = None;
        self.selected_neighbor = None;
        self.selected_edge = id;
        Ok(())
    }

    fn require_node(&self, id: &str) -> Result<()> {
        match &self.graph {
            Some(graph) if graph.node(id).is_some() => Ok(()),
            _ => Err(DgiError::InvalidInput(format!("unknown node '{}'", id))),
        }
    }

    pub fn view(&self) -> DashboardView {
        let graph = self.graph.as_ref();
        let neighbor_options = match (graph, &self.selected_node) {
            (Some(g), Some(node)) => g.neighbors(node).into_iter().map(String::from).collect(),
            _ => Vec::new(),
        };
        let edge = graph.zip(self.selected_edge.as_deref()).and_then(|(g, id)| g.edge(id));
        let selected_text = self
            .selected_node
            .clone()
            .or_else(|| self.selected_edge.clone())
            .unwrap_or_else(|| NO_NODE_SELECTED.to_string());

        DashboardView {
            mode: self.mode,
            genes: self.genes.clone(),
            elements: graph.map(to_elements).unwrap_or_default(),
            node_count: graph.map_or(0, InteractionGraph::node_count),
            edge_count: graph.map_or(0, InteractionGraph::edge_count),
            selected_node: self.selected_node.clone(),
            selected_text,
            neighbor_options,
            selected_neighbor: self.selected_neighbor.clone(),
            selected_edge: self.selected_edge.clone(),
            edge_info: edge.map_or_else(|| NO_EDGE_SELECTED.to_string(), format_edge_info),
            message: self.message.clone(),
        }
    }

    fn selection_event(&self) -> AppEvent {
        AppEvent::SelectionChanged {
            selected_node: self.selected_node.clone(),
            selected_neighbor: self.selected_neighbor.clone(),
            selected_edge: self.selected_edge.clone(),
        }
    }

    /// Apply one event and report what should be broadcast.
    pub async fn apply(
        &mut self,
        event: SelectionEvent,
        source: &dyn InteractionSource,
    ) -> Result<Option<AppEvent>> {
        match event {
            SelectionEvent::SelectGenes { terms, mode } => {
                let diff = self.select_terms(mode, terms, source).await?;
                Ok(Some(AppEvent::GraphUpdated {
                    mode: self.mode,
                    genes: self.genes.clone(),
                    summary: diff.summary,
                }))
            }
            SelectionEvent::SelectNode(id) => {
                self.select_node(id)?;
                Ok(Some(self.selection_event()))
            }
            SelectionEvent::SelectNeighbor(id) => {
                self.select_neighbor(id)?;
                Ok(Some(self.selection_event()))
            }
            SelectionEvent::SelectEdge(id) => {
                self.select_edge(id)?;
                Ok(Some(self.selection_event()))
            }
            SelectionEvent::View => Ok(None),
        }
    }
}

fn empty_message(mode: SearchMode) -> &'static str {
    match mode {
        SearchMode::Genes => NO_INTERACTIONS,
        SearchMode::Drugs => NO_DRUG_INTERACTIONS,
    }
}

/// Trimmed, upper-cased, without blanks or repeats; first occurrence wins.
pub fn clean_terms(terms: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(terms.len());
    for term in terms {
        let term = term.trim().to_uppercase();
        if !term.is_empty() && !out.contains(&term) {
            out.push(term);
        }
    }
    out
}

/// Text for the edge-info panel.
pub fn format_edge_info(edge: &Edge) -> String {
    let approval = edge.approved.map_or("unknown".to_string(), |a| a.to_string());
    let score = edge.score.map_or("n/a".to_string(), |s| s.to_string());
    let attributes = edge
        .attributes
        .iter()
        .map(|(name, values)| format!("{}: {}", name, values.join(", ")))
        .collect::<Vec<_>>()
        .join("; ");
    let pmids = edge
        .pmids
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "ID: {}\n\nApproval: {}\n\nScore: {}\n\nAttributes: {}\n\nSource: {}\n\nPmid: {}",
        edge.id,
        approval,
        score,
        attributes,
        edge.sources.join(", "),
        pmids
    )
}

struct Command {
    event: SelectionEvent,
    reply: oneshot::Sender<Result<DashboardView>>,
}

/// Sending side of the update loop.
#[derive(Clone)]
pub struct DashboardHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl DashboardHandle {
    pub async fn send(&self, event: SelectionEvent) -> Result<DashboardView> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command { event, reply })
            .map_err(|_| DgiError::Other(anyhow!("dashboard loop has stopped")))?;
        rx.await
            .map_err(|_| DgiError::Other(anyhow!("dashboard loop dropped the request")))?
    }

    pub async fn view(&self) -> Result<DashboardView> {
        self.send(SelectionEvent::View).await
    }
}

/// Spawn the update loop. It runs until every handle is dropped.
pub fn start_dashboard_loop(
    source: Arc<dyn InteractionSource>,
    events: broadcast::Sender<AppEvent>,
) -> DashboardHandle {
    let (tx, mut rx) = mpsc::unbounded_channel::<Command>();

    tokio::spawn(async move {
        info!("Started dashboard update loop");
        let mut session = Session::default();

        while let Some(Command { event, reply }) = rx.recv().await {
            debug!(?event, "Dashboard event");
            let result = match session.apply(event, source.as_ref()).await {
                Ok(broadcast) => {
                    if let Some(event) = broadcast {
                        let _ = events.send(event);
                    }
                    Ok(session.view())
                }
                Err(e) => {
                    warn!(error = %e, "Dashboard event failed");
                    let _ = events.send(AppEvent::Notification {
                        level: "error".into(),
                        message: e.to_string(),
                    });
                    Err(e)
                }
            };
            let _ = reply.send(result);
        }

        debug!("Dashboard update loop stopped");
    });

    DashboardHandle { tx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dgirs_client::{Attributes, DrugListEntry, GeneListEntry, InteractionRecord};
    use pretty_assertions::assert_eq;

    fn record(gene: &str, drug: &str) -> InteractionRecord {
        InteractionRecord {
            gene_name: gene.into(),
            gene_long_name: None,
            drug_name: drug.into(),
            approved: Some(true),
            interaction_score: Some(2.5),
            interaction_attributes: Attributes::new(),
            sources: vec!["DTC".into(), "CIViC".into()],
            pmids: vec![123, 456],
        }
    }

    /// Serves a fixed set of rows, filtered to the requested genes or drugs.
    struct FixedSource {
        rows: Vec<InteractionRecord>,
    }

    #[async_trait]
    impl InteractionSource for FixedSource {
        async fn interactions(
            &self,
            terms: &[String],
            mode: SearchMode,
            _filters: &InteractionFilters,
        ) -> Result<Vec<InteractionRecord>> {
            if terms.iter().any(|t| t == "BROKEN") {
                return Err(DgiError::GraphQl(vec!["boom".into()]));
            }
            Ok(self
                .rows
                .iter()
                .filter(|r| match mode {
                    SearchMode::Genes => terms.contains(&r.gene_name),
                    SearchMode::Drugs => terms.contains(&r.drug_name),
                })
                .cloned()
                .collect())
        }

        async fn gene_list(&self) -> Result<Vec<GeneListEntry>> {
            Ok(Vec::new())
        }

        async fn drug_list(&self) -> Result<Vec<DrugListEntry>> {
            Ok(Vec::new())
        }
    }

    fn source() -> FixedSource {
        FixedSource {
            rows: vec![
                record("BRAF", "IMATINIB"),
                record("ABL1", "IMATINIB"),
                record("BRAF", "DASATINIB"),
            ],
        }
    }

    fn genes(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_clean_terms() {
        let cleaned = clean_terms(genes(&[" braf", "ABL1", "", "BRAF", "  "]));
        assert_eq!(cleaned, vec!["BRAF", "ABL1"]);
    }

    #[test]
    fn test_format_edge_info() {
        let mut edge = Edge {
            id: "BRAF - IMATINIB".into(),
            gene: "BRAF".into(),
            drug: "IMATINIB".into(),
            score: Some(2.5),
            approved: Some(true),
            sources: vec!["DTC".into(), "CIViC".into()],
            pmids: vec![123, 456],
            attributes: Attributes::new(),
        };
        edge.attributes.insert("Mechanism of Action".into(), vec!["Inhibition".into()]);

        assert_eq!(
            format_edge_info(&edge),
            "ID: BRAF - IMATINIB\n\nApproval: true\n\nScore: 2.5\n\n\
             Attributes: Mechanism of Action: Inhibition\n\nSource: DTC, CIViC\n\nPmid: 123, 456"
        );

        edge.approved = None;
        edge.score = None;
        assert!(format_edge_info(&edge).contains("Approval: unknown\n\nScore: n/a"));
    }

    #[tokio::test]
    async fn test_select_genes_builds_graph() {
        let source = source();
        let mut session = Session::default();

        let diff = session.select_genes(genes(&["BRAF", "ABL1"]), &source).await.unwrap();
        assert_eq!(diff.summary.node_count, 4);
        assert_eq!(diff.summary.edge_count, 3);

        let view = session.view();
        assert_eq!(view.genes, vec!["BRAF", "ABL1"]);
        assert_eq!(view.node_count, 4);
        assert_eq!(view.edge_count, 3);
        assert!(view.message.is_none());
        assert_eq!(view.selected_text, NO_NODE_SELECTED);
        assert_eq!(view.edge_info, NO_EDGE_SELECTED);
    }

    #[tokio::test]
    async fn test_no_interactions_shows_empty_state() {
        let source = source();
        let mut session = Session::default();

        session.select_genes(genes(&["TP53"]), &source).await.unwrap();
        let view = session.view();
        assert!(session.graph().is_none());
        assert!(view.elements.is_empty());
        assert_eq!(view.message.as_deref(), Some(NO_INTERACTIONS));
    }

    #[tokio::test]
    async fn test_empty_selection_clears_graph() {
        let source = source();
        let mut session = Session::default();
        session.select_genes(genes(&["BRAF"]), &source).await.unwrap();

        let diff = session.select_genes(Vec::new(), &source).await.unwrap();
        assert_eq!(diff.removed_nodes.len(), 3);
        assert!(session.graph().is_none());
        assert!(session.view().message.is_none());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_graph() {
        let source = source();
        let mut session = Session::default();
        session.select_genes(genes(&["BRAF"]), &source).await.unwrap();

        let err = session.select_genes(genes(&["BROKEN"]), &source).await.unwrap_err();
        assert!(matches!(err, DgiError::GraphQl(_)));
        assert_eq!(session.view().genes, vec!["BRAF"]);
        assert!(session.graph().is_some());
    }

    #[tokio::test]
    async fn test_node_and_neighbour_selection() {
        let source = source();
        let mut session = Session::default();
        session.select_genes(genes(&["BRAF", "ABL1"]), &source).await.unwrap();

        session.select_node(Some("IMATINIB".into())).unwrap();
        let view = session.view();
        assert_eq!(view.neighbor_options, vec!["ABL1", "BRAF"]);
        assert_eq!(view.selected_text, "IMATINIB");
        assert_eq!(view.edge_info, NO_EDGE_SELECTED);

        session.select_neighbor(Some("ABL1".into())).unwrap();
        let view = session.view();
        assert_eq!(view.selected_edge.as_deref(), Some("ABL1 - IMATINIB"));
        assert!(view.edge_info.starts_with("ID: ABL1 - IMATINIB\n\nApproval: true"));

        let err = session.select_neighbor(Some("DASATINIB".into())).unwrap_err();
        assert!(matches!(err, DgiError::InvalidInput(_)));

        session.select_neighbor(None).unwrap();
        assert_eq!(session.view().edge_info, NO_EDGE_SELECTED);
    }

    #[tokio::test]
    async fn test_selecting_genes_resets_node_selection() {
        let source = source();
        let mut session = Session::default();
        session.select_genes(genes(&["BRAF"]), &source).await.unwrap();
        session.select_node(Some("BRAF".into())).unwrap();
        session.select_neighbor(Some("DASATINIB".into())).unwrap();

        session.select_genes(genes(&["BRAF", "ABL1"]), &source).await.unwrap();
        let view = session.view();
        assert!(view.selected_node.is_none());
        assert!(view.selected_neighbor.is_none());
        assert!(view.neighbor_options.is_empty());
        assert_eq!(view.edge_info, NO_EDGE_SELECTED);
    }

    #[tokio::test]
    async fn test_select_edge_and_unknown_ids() {
        let source = source();
        let mut session = Session::default();
        session.select_genes(genes(&["BRAF"]), &source).await.unwrap();

        session.select_edge(Some("BRAF - DASATINIB".into())).unwrap();
        let view = session.view();
        assert_eq!(view.selected_text, "BRAF - DASATINIB");
        assert!(view.edge_info.contains("Source: DTC, CIViC"));

        assert!(session.select_edge(Some("NOPE".into())).is_err());
        assert!(session.select_node(Some("NOPE".into())).is_err());
        // Failed selections leave the previous one in place.
        assert_eq!(session.view().selected_edge.as_deref(), Some("BRAF - DASATINIB"));
    }

    #[tokio::test]
    async fn test_loop_replies_and_broadcasts() {
        let (events, mut rx) = broadcast::channel(16);
        let handle = start_dashboard_loop(Arc::new(source()), events);

        let view = handle
            .send(SelectionEvent::SelectGenes {
                terms: genes(&["BRAF", "ABL1"]),
                mode: SearchMode::Genes,
            })
            .await
            .unwrap();
        assert_eq!(view.edge_count, 3);
        match rx.recv().await.unwrap() {
            AppEvent::GraphUpdated { mode, genes, summary } => {
                assert_eq!(mode, SearchMode::Genes);
                assert_eq!(genes, vec!["BRAF", "ABL1"]);
                assert_eq!(summary.node_count, 4);
            }
            other => panic!("unexpected event {:?}", other),
        }

        handle
            .send(SelectionEvent::SelectNode(Some("BRAF".into())))
            .await
            .unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            AppEvent::SelectionChanged {
                selected_node: Some("BRAF".into()),
                selected_neighbor: None,
                selected_edge: None,
            }
        );

        let err = handle
            .send(SelectionEvent::SelectNode(Some("NOPE".into())))
            .await
            .unwrap_err();
        assert!(matches!(err, DgiError::InvalidInput(_)));
        assert!(matches!(rx.recv().await.unwrap(), AppEvent::Notification { .. }));

        let view = handle.view().await.unwrap();
        assert_eq!(view.selected_node.as_deref(), Some("BRAF"));
    }

    #[tokio::test]
    async fn test_drug_search_classifies_genes() {
        let source = source();
        let mut session = Session::default();

        session
            .select_terms(SearchMode::Drugs, genes(&["imatinib", "DASATINIB"]), &source)
            .await
            .unwrap();
        let view = session.view();
        assert_eq!(view.mode, SearchMode::Drugs);
        assert_eq!(view.genes, vec!["IMATINIB", "DASATINIB"]);
        assert_eq!(view.node_count, 4);
        assert_eq!(view.edge_count, 3);

        let graph = session.graph().unwrap();
        assert_eq!(graph.mode, SearchMode::Drugs);
        assert!(graph.node("IMATINIB").unwrap().queried);
        assert_eq!(
            graph.node("BRAF").unwrap().group.as_deref(),
            Some("Group: DASATINIB-IMATINIB")
        );

        // Picking a gene neighbour of a drug selects the connecting edge.
        session.select_node(Some("IMATINIB".into())).unwrap();
        assert_eq!(session.view().neighbor_options, vec!["ABL1", "BRAF"]);
        session.select_neighbor(Some("ABL1".into())).unwrap();
        assert_eq!(session.view().selected_edge.as_deref(), Some("ABL1 - IMATINIB"));
    }

    #[tokio::test]
    async fn test_drug_search_without_rows_shows_drug_message() {
        let source = source();
        let mut session = Session::default();

        session
            .select_terms(SearchMode::Drugs, genes(&["ASPIRIN"]), &source)
            .await
            .unwrap();
        assert_eq!(session.view().message.as_deref(), Some(NO_DRUG_INTERACTIONS));

        // Switching back to genes mode rebuilds from gene rows.
        session.select_genes(genes(&["BRAF"]), &source).await.unwrap();
        assert_eq!(session.mode(), SearchMode::Genes);
        assert_eq!(session.view().node_count, 3);
    }
}
