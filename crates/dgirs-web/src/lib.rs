//! dgirs-web — Interactive drug-gene interaction dashboard.
//!
//! Serves a single page that renders the interaction graph for the selected
//! genes with Cytoscape.js, plus the JSON endpoints and SSE stream it talks to.

pub mod handlers;
pub mod router;
pub mod session;
pub mod sse;
pub mod state;
