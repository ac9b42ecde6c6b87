//! Cytoscape.js element export.
//!
//! Classified nodes are parented to a compound node per neighbour group so
//! the browser layout clusters drugs that hit the same genes.

use dgirs_client::Attributes;
use serde::Serialize;

use crate::builder::{DegreeClass, InteractionGraph, NodeKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "group")]
pub enum Element {
    #[serde(rename = "nodes")]
    Node { data: NodeData, classes: String },
    #[serde(rename = "edges")]
    Edge { data: EdgeData, classes: String },
}

impl Element {
    pub fn id(&self) -> &str {
        match self {
            Element::Node { data, .. } => &data.id,
            Element::Edge { data, .. } => &data.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeData {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<NodeKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree_class: Option<DegreeClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeData {
    pub id: String,
    pub source: String,
    pub target: String,
    pub score: Option<f64>,
    pub approved: Option<bool>,
    pub sources: Vec<String>,
    pub pmids: Vec<i64>,
    pub attributes: Attributes,
}

/// Group nodes first, then graph nodes, then edges.
pub fn to_elements(graph: &InteractionGraph) -> Vec<Element> {
    let mut elements = Vec::with_capacity(graph.node_count() + graph.edge_count());

    for group in graph.groups().into_keys() {
        elements.push(Element::Node {
            data: NodeData {
                id: group.to_string(),
                label: group.to_string(),
                kind: None,
                degree_class: None,
                parent: None,
            },
            classes: "group".into(),
        });
    }

    for node in graph.nodes.values() {
        let mut classes = vec![node.kind.as_str()];
        if let Some(class) = node.degree_class {
            classes.push(class.as_str());
        }
        if node.queried {
            classes.push("queried");
        }
        elements.push(Element::Node {
            data: NodeData {
                id: node.id.clone(),
                label: node.name.clone(),
                kind: Some(node.kind),
                degree_class: node.degree_class,
                parent: node.group.clone(),
            },
            classes: classes.join(" "),
        });
    }

    for edge in &graph.edges {
        let classes = match edge.approved {
            Some(true) => "approved",
            Some(false) => "unapproved",
            None => "",
        };
        elements.push(Element::Edge {
            data: EdgeData {
                id: edge.id.clone(),
                source: edge.gene.clone(),
                target: edge.drug.clone(),
                score: edge.score,
                approved: edge.approved,
                sources: edge.sources.clone(),
                pmids: edge.pmids.clone(),
                attributes: edge.attributes.clone(),
            },
            classes: classes.into(),
        });
    }

    elements
}
