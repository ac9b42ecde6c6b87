//! Build a gene/drug interaction graph from flattened interaction rows.
//!
//! Nodes are keyed by name, except when a gene and a drug share a name: both
//! then get a kind-qualified id such as `CALCITONIN (drug)`. Every record
//! yields exactly one edge; repeated gene-drug pairs are kept as parallel
//! edges. Nodes on the non-queried side are classified by how many distinct
//! neighbours they have.

use dgirs_client::{Attributes, InteractionRecord, SearchMode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("no interactions to build a graph from")]
    EmptyInput,

    #[error("interaction record {index} is missing its {field}")]
    MalformedRecord { index: usize, field: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Gene,
    Drug,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Gene => "gene",
            NodeKind::Drug => "drug",
        }
    }

    /// Kind of the terms a search is made with.
    pub fn queried_in(mode: SearchMode) -> Self {
        match mode {
            SearchMode::Genes => NodeKind::Gene,
            SearchMode::Drugs => NodeKind::Drug,
        }
    }

    pub fn other(&self) -> Self {
        match self {
            NodeKind::Gene => NodeKind::Drug,
            NodeKind::Drug => NodeKind::Gene,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegreeClass {
    SingleDegree,
    MultiDegree,
}

impl DegreeClass {
    pub fn from_degree(degree: usize) -> Self {
        if degree <= 1 {
            DegreeClass::SingleDegree
        } else {
            DegreeClass::MultiDegree
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DegreeClass::SingleDegree => "single-degree",
            DegreeClass::MultiDegree => "multi-degree",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    /// Display name. Equal to `id` unless the name is shared across kinds.
    pub name: String,
    pub kind: NodeKind,
    /// Distinct neighbours.
    pub degree: usize,
    /// Set on the classified side only.
    pub degree_class: Option<DegreeClass>,
    /// `Group: A-B` label shared by classified nodes with the same neighbours.
    pub group: Option<String>,
    /// True when the node was one of the search terms.
    pub queried: bool,
    pub long_name: Option<String>,
}

impl Node {
    fn new(id: String, name: &str, kind: NodeKind) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind,
            degree: 0,
            degree_class: None,
            group: None,
            queried: false,
            long_name: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// `"<GENE> - <DRUG>"`, with a `#n` suffix on repeated pairs.
    pub id: String,
    /// Node id of the gene endpoint.
    pub gene: String,
    /// Node id of the drug endpoint.
    pub drug: String,
    pub score: Option<f64>,
    pub approved: Option<bool>,
    pub sources: Vec<String>,
    pub pmids: Vec<i64>,
    pub attributes: Attributes,
}

impl Edge {
    pub fn touches(&self, node: &str) -> bool {
        self.gene == node || self.drug == node
    }

    /// The endpoint opposite `node`, if the edge touches it.
    pub fn other_end(&self, node: &str) -> Option<&str> {
        if self.gene == node {
            Some(&self.drug)
        } else if self.drug == node {
            Some(&self.gene)
        } else {
            None
        }
    }
}

pub fn edge_id(gene: &str, drug: &str) -> String {
    format!("{} - {}", gene, drug)
}

/// Node id for `name`. Names used by both a gene and a drug are qualified
/// with the kind so the two nodes stay distinct.
fn node_id(kind: NodeKind, name: &str, shared: &BTreeSet<&str>) -> String {
    if shared.contains(name) {
        format!("{} ({})", name, kind.as_str())
    } else {
        name.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionGraph {
    pub mode: SearchMode,
    pub nodes: BTreeMap<String, Node>,
    pub edges: Vec<Edge>,
}

impl InteractionGraph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(move |n| n.kind == kind)
    }

    /// Distinct nodes sharing an edge with `id`, sorted.
    pub fn neighbors(&self, id: &str) -> BTreeSet<&str> {
        self.edges.iter().filter_map(|e| e.other_end(id)).collect()
    }

    /// Edges joining `a` and `b` in either orientation, in insertion order.
    pub fn edges_between(&self, a: &str, b: &str) -> Vec<&Edge> {
        self.edges
            .iter()
            .filter(|e| (e.gene == a && e.drug == b) || (e.gene == b && e.drug == a))
            .collect()
    }

    /// Drugs interacting with both genes.
    pub fn shared_drugs(&self, gene_a: &str, gene_b: &str) -> BTreeSet<&str> {
        let a = self.neighbors(gene_a);
        self.neighbors(gene_b)
            .into_iter()
            .filter(|d| a.contains(d))
            .collect()
    }

    /// Classified node ids per group label.
    pub fn groups(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for node in self.nodes.values() {
            if let Some(group) = &node.group {
                groups.entry(group.as_str()).or_default().push(&node.id);
            }
        }
        groups
    }
}

/// Build a graph for a gene search. See [`build_graph_with_mode`].
pub fn build_graph<S: AsRef<str>>(
    queried_genes: &[S],
    interactions: &[InteractionRecord],
) -> Result<InteractionGraph, GraphError> {
    build_graph_with_mode(SearchMode::Genes, queried_genes, interactions)
}

/// Build a graph from the rows returned for `terms`.
///
/// Queried terms become nodes even if no record mentions them. Records that
/// cite a term outside `terms` still contribute their nodes and edge.
/// Nodes on the side opposite the queried kind get a degree class and a
/// group label from their distinct neighbours.
pub fn build_graph_with_mode<S: AsRef<str>>(
    mode: SearchMode,
    terms: &[S],
    interactions: &[InteractionRecord],
) -> Result<InteractionGraph, GraphError> {
    if interactions.is_empty() {
        return Err(GraphError::EmptyInput);
    }
    for (index, record) in interactions.iter().enumerate() {
        if record.gene_name.trim().is_empty() {
            return Err(GraphError::MalformedRecord { index, field: "gene_name" });
        }
        if record.drug_name.trim().is_empty() {
            return Err(GraphError::MalformedRecord { index, field: "drug_name" });
        }
    }

    let queried_kind = NodeKind::queried_in(mode);
    let classified_kind = queried_kind.other();

    let mut gene_names: BTreeSet<&str> = interactions.iter().map(|r| r.gene_name.as_str()).collect();
    let mut drug_names: BTreeSet<&str> = interactions.iter().map(|r| r.drug_name.as_str()).collect();
    let queried_names = match queried_kind {
        NodeKind::Gene => &mut gene_names,
        NodeKind::Drug => &mut drug_names,
    };
    queried_names.extend(terms.iter().map(|t| t.as_ref()));
    let shared: BTreeSet<&str> = gene_names.intersection(&drug_names).copied().collect();
    if !shared.is_empty() {
        debug!(names = ?shared, "Names used by both genes and drugs");
    }

    let mut nodes: BTreeMap<String, Node> = BTreeMap::new();
    for term in terms {
        let term = term.as_ref();
        let id = node_id(queried_kind, term, &shared);
        nodes
            .entry(id.clone())
            .or_insert_with(|| Node::new(id, term, queried_kind))
            .queried = true;
    }

    let mut edges = Vec::with_capacity(interactions.len());
    let mut pair_counts: HashMap<(&str, &str), usize> = HashMap::new();
    for record in interactions {
        let gene_id = node_id(NodeKind::Gene, &record.gene_name, &shared);
        let drug_id = node_id(NodeKind::Drug, &record.drug_name, &shared);

        let gene = nodes
            .entry(gene_id.clone())
            .or_insert_with(|| Node::new(gene_id.clone(), &record.gene_name, NodeKind::Gene));
        if gene.long_name.is_none() {
            gene.long_name = record.gene_long_name.clone();
        }
        nodes
            .entry(drug_id.clone())
            .or_insert_with(|| Node::new(drug_id.clone(), &record.drug_name, NodeKind::Drug));

        let seen = pair_counts
            .entry((record.gene_name.as_str(), record.drug_name.as_str()))
            .or_insert(0);
        *seen += 1;
        let mut id = edge_id(&record.gene_name, &record.drug_name);
        if *seen > 1 {
            id = format!("{} #{}", id, seen);
        }

        edges.push(Edge {
            id,
            gene: gene_id,
            drug: drug_id,
            score: record.interaction_score,
            approved: record.approved,
            sources: record.sources.clone(),
            pmids: record.pmids.clone(),
            attributes: record.interaction_attributes.clone(),
        });
    }

    let mut adjacency: HashMap<&str, BTreeSet<&str>> = HashMap::new();
    for edge in &edges {
        adjacency.entry(&edge.gene).or_default().insert(&edge.drug);
        adjacency.entry(&edge.drug).or_default().insert(&edge.gene);
    }

    for node in nodes.values_mut() {
        let neighbours = adjacency.get(node.id.as_str());
        node.degree = neighbours.map_or(0, BTreeSet::len);
        if node.kind != classified_kind {
            continue;
        }
        if let Some(neighbours) = neighbours {
            node.degree_class = Some(DegreeClass::from_degree(neighbours.len()));
            node.group = Some(group_label(neighbours.iter().copied()));
        }
    }

    debug!(
        mode = %mode,
        nodes = nodes.len(),
        edges = edges.len(),
        "Interaction graph built"
    );

    Ok(InteractionGraph { mode, nodes, edges })
}

/// `Group: A-B` for a sorted neighbour set.
pub fn group_label<'a>(neighbours: impl IntoIterator<Item = &'a str>) -> String {
    let names: Vec<&str> = neighbours.into_iter().collect();
    format!("Group: {}", names.join("-"))
}
