//! Dashboard handler — the single page hosting the interaction graph.

use axum::{extract::State, response::Html};
use dgirs_client::GeneList;

use crate::state::SharedState;

/// Navigation HTML shared by every page
pub const NAV_HTML: &str = include_str!("../../templates/nav.html");
const DASHBOARD_CSS: &str = include_str!("../../templates/dashboard.css");
const DASHBOARD_JS: &str = include_str!("../../templates/dashboard.js");

pub async fn dashboard(State(state): State<SharedState>) -> Html<String> {
    let genes = state.genes.snapshot().await;
    let drugs = state.drugs.snapshot().await;
    Html(render_dashboard(&options(&genes), genes.len(), &options(&drugs), drugs.len()))
}

fn options(list: &GeneList) -> String {
    list.names()
        .map(|name| format!(r#"<option value="{}">"#, escape_html(name)))
        .collect()
}

fn render_dashboard(gene_options: &str, gene_count: usize, drug_options: &str, drug_count: usize) -> String {
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Interaction Graph — dgirs</title>
    <style>{}</style>
    <script src="https://unpkg.com/cytoscape@3.30.2/dist/cytoscape.min.js"></script>
</head>
<body>
{}
<div class="layout">
    <div class="card">
        <div class="card-header">Interaction Graph <span id="graph-stats" class="nav-subtitle"></span></div>
        <div id="empty-state" class="empty-state">Select genes or drugs to build a graph.</div>
        <div id="cy"></div>
    </div>
    <div>
        <div class="card">
            <div class="card-header">Search Terms</div>
            <div class="card-body">
                <div id="search-mode" class="mode-toggle">
                    <label><input type="radio" name="search-mode" value="genes" checked> Genes</label>
                    <label><input type="radio" name="search-mode" value="drugs"> Drugs</label>
                </div>
                <form id="gene-form">
                    <input id="gene-input" list="gene-list" placeholder="Add a gene ({} known)" data-gene-count="{}" data-drug-count="{}" autocomplete="off">
                    <datalist id="gene-list">{}</datalist>
                    <datalist id="drug-list">{}</datalist>
                </form>
                <div id="gene-chips" class="chips"></div>
                <p><button id="clear-genes" class="btn">Clear</button></p>
                <div id="error" class="error"></div>
            </div>
        </div>
        <div class="card">
            <div class="card-header">Neighbors</div>
            <div class="card-body"><select id="neighbor-select"></select></div>
        </div>
        <div class="card">
            <div class="card-body">
                <h4>Selected Node/Edge:</h4>
                <p id="selected-text">No Node Selected</p>
                <h4>Selected Edge Info:</h4>
                <div id="edge-info">No Edge Selected</div>
            </div>
        </div>
    </div>
</div>
<script>{}</script>
</body>
</html>"#, DASHBOARD_CSS, NAV_HTML, gene_count, gene_count, drug_count, gene_options, drug_options, DASHBOARD_JS)
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
