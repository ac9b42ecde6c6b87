//! Change detection between two successive dashboard graphs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::builder::InteractionGraph;

/// What changed between the previous graph and the new one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphDiff {
    pub added_nodes: Vec<String>,
    pub removed_nodes: Vec<String>,
    /// Present in both graphs with a different degree class.
    pub reclassified_nodes: Vec<String>,
    pub added_edges: Vec<String>,
    pub removed_edges: Vec<String>,
    pub summary: DiffSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub added_count: usize,
    pub removed_count: usize,
    pub reclassified_count: usize,
}

impl GraphDiff {
    pub fn is_empty(&self) -> bool {
        self.added_nodes.is_empty()
            && self.removed_nodes.is_empty()
            && self.reclassified_nodes.is_empty()
            && self.added_edges.is_empty()
            && self.removed_edges.is_empty()
    }
}

/// Diff `previous` against `next`. A missing graph counts as empty.
pub fn diff_graphs(previous: Option<&InteractionGraph>, next: Option<&InteractionGraph>) -> GraphDiff {
    let node_ids = |g: Option<&InteractionGraph>| -> BTreeSet<String> {
        g.map(|g| g.nodes.keys().cloned().collect()).unwrap_or_default()
    };
    let edge_ids = |g: Option<&InteractionGraph>| -> BTreeSet<String> {
        g.map(|g| g.edges.iter().map(|e| e.id.clone()).collect())
            .unwrap_or_default()
    };

    let (old_nodes, new_nodes) = (node_ids(previous), node_ids(next));
    let (old_edges, new_edges) = (edge_ids(previous), edge_ids(next));

    let reclassified_nodes: Vec<String> = match (previous, next) {
        (Some(prev), Some(next)) => old_nodes
            .intersection(&new_nodes)
            .filter(|id| {
                let before = prev.node(id).and_then(|n| n.degree_class);
                let after = next.node(id).and_then(|n| n.degree_class);
                before != after
            })
            .cloned()
            .collect(),
        _ => Vec::new(),
    };

    let added_nodes: Vec<String> = new_nodes.difference(&old_nodes).cloned().collect();
    let removed_nodes: Vec<String> = old_nodes.difference(&new_nodes).cloned().collect();
    let added_edges: Vec<String> = new_edges.difference(&old_edges).cloned().collect();
    let removed_edges: Vec<String> = old_edges.difference(&new_edges).cloned().collect();

    let summary = DiffSummary {
        node_count: new_nodes.len(),
        edge_count: new_edges.len(),
        added_count: added_nodes.len() + added_edges.len(),
        removed_count: removed_nodes.len() + removed_edges.len(),
        reclassified_count: reclassified_nodes.len(),
    };

    GraphDiff {
        added_nodes,
        removed_nodes,
        reclassified_nodes,
        added_edges,
        removed_edges,
        summary,
    }
}
