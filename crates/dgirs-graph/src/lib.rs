//! dgirs-graph — Drug-gene interaction graphs.
//!
//! Turns flat interaction rows into a gene/drug graph with degree
//! classification, exports it as Cytoscape elements and diffs successive
//! graphs for the dashboard.

pub mod builder;
pub mod cytoscape;
pub mod diff;

pub use builder::{
    build_graph, build_graph_with_mode, DegreeClass, Edge, GraphError, InteractionGraph, Node,
    NodeKind,
};
pub use cytoscape::{to_elements, Element};
pub use diff::{diff_graphs, GraphDiff};
