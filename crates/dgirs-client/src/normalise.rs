//! Flattening of nested GraphQL results into row-oriented records.
//!
//! Every function takes the `data` member of a response (see
//! [`crate::graphql::extract_data`]) and returns one row per drug, gene,
//! interaction, category or source. Missing scalars become `None`; a missing
//! `<root>.nodes` container is an [`DgiError::UnexpectedResponse`].

use dgirs_common::{DgiError, Result};
use serde_json::Value;

use crate::models::{
    ApprovalRating, Attributes, DrugListEntry, DrugRecord, GeneCategoryRecord, GeneListEntry, GeneRecord,
    InteractionRecord, SourceRecord,
};

fn nodes<'a>(data: &'a Value, root: &str) -> Result<&'a Vec<Value>> {
    data[root]["nodes"]
        .as_array()
        .ok_or_else(|| DgiError::UnexpectedResponse(format!("missing `{}.nodes`", root)))
}

fn string(v: &Value) -> String {
    v.as_str().unwrap_or_default().to_string()
}

fn opt_string(v: &Value) -> Option<String> {
    v.as_str().map(String::from)
}

fn strings(v: &Value, key: &str) -> Vec<String> {
    v.as_array()
        .map(|arr| arr.iter().filter_map(|x| x[key].as_str().map(String::from)).collect())
        .unwrap_or_default()
}

fn array(v: &Value) -> &[Value] {
    v.as_array().map(Vec::as_slice).unwrap_or_default()
}

/// Group `[{name, value}, ...]` pairs into `name -> [values...]`.
pub fn group_attributes(attrs: &Value) -> Attributes {
    let mut grouped = Attributes::new();
    for attr in array(attrs) {
        let Some(name) = attr["name"].as_str() else { continue };
        let value = match &attr["value"] {
            Value::String(s) => s.clone(),
            Value::Null => continue,
            other => other.to_string(),
        };
        grouped.entry(name.to_string()).or_default().push(value);
    }
    grouped
}

/// Collect source names and PubMed ids across all claims of an interaction.
fn claim_provenance(interaction: &Value) -> (Vec<String>, Vec<i64>) {
    let mut sources = Vec::new();
    let mut pmids = Vec::new();
    for claim in array(&interaction["interactionClaims"]) {
        if let Some(src) = claim["source"]["sourceDbName"].as_str() {
            sources.push(src.to_string());
        }
        pmids.extend(array(&claim["publications"]).iter().filter_map(|p| p["pmid"].as_i64()));
    }
    (sources, pmids)
}

pub fn drugs(data: &Value) -> Result<Vec<DrugRecord>> {
    Ok(nodes(data, "drugs")?
        .iter()
        .map(|m| DrugRecord {
            name: string(&m["name"]),
            concept_id: string(&m["conceptId"]),
            aliases: strings(&m["drugAliases"], "alias"),
            attributes: group_attributes(&m["drugAttributes"]),
            antineoplastic: m["antiNeoplastic"].as_bool(),
            immunotherapy: m["immunotherapy"].as_bool(),
            approved: m["approved"].as_bool(),
            approval_ratings: array(&m["drugApprovalRatings"])
                .iter()
                .map(|r| ApprovalRating {
                    rating: string(&r["rating"]),
                    source: string(&r["source"]["sourceDbName"]),
                })
                .collect(),
            fda_applications: strings(&m["drugApplications"], "appNo"),
        })
        .collect())
}

pub fn genes(data: &Value) -> Result<Vec<GeneRecord>> {
    Ok(nodes(data, "genes")?
        .iter()
        .map(|m| GeneRecord {
            name: string(&m["name"]),
            concept_id: string(&m["conceptId"]),
            aliases: strings(&m["geneAliases"], "alias"),
            attributes: group_attributes(&m["geneAttributes"]),
        })
        .collect())
}

/// One row per (gene, interaction) from a gene-centric search.
pub fn interactions_by_gene(data: &Value) -> Result<Vec<InteractionRecord>> {
    let mut rows = Vec::new();
    for gene in nodes(data, "genes")? {
        let gene_name = string(&gene["name"]);
        let long_name = opt_string(&gene["longName"]);
        for interaction in array(&gene["interactions"]) {
            let (sources, pmids) = claim_provenance(interaction);
            rows.push(InteractionRecord {
                gene_name: gene_name.clone(),
                gene_long_name: long_name.clone(),
                drug_name: string(&interaction["drug"]["name"]),
                approved: interaction["drug"]["approved"].as_bool(),
                interaction_score: interaction["interactionScore"].as_f64(),
                interaction_attributes: group_attributes(&interaction["interactionAttributes"]),
                sources,
                pmids,
            });
        }
    }
    Ok(rows)
}

/// One row per (drug, interaction) from a drug-centric search.
pub fn interactions_by_drug(data: &Value) -> Result<Vec<InteractionRecord>> {
    let mut rows = Vec::new();
    for drug in nodes(data, "drugs")? {
        let drug_name = string(&drug["name"]);
        let approved = drug["approved"].as_bool();
        for interaction in array(&drug["interactions"]) {
            let (sources, pmids) = claim_provenance(interaction);
            rows.push(InteractionRecord {
                gene_name: string(&interaction["gene"]["name"]),
                gene_long_name: opt_string(&interaction["gene"]["longName"]),
                drug_name: drug_name.clone(),
                approved,
                interaction_score: interaction["interactionScore"].as_f64(),
                interaction_attributes: group_attributes(&interaction["interactionAttributes"]),
                sources,
                pmids,
            });
        }
    }
    Ok(rows)
}

pub fn gene_categories(data: &Value) -> Result<Vec<GeneCategoryRecord>> {
    let mut rows = Vec::new();
    for gene in nodes(data, "genes")? {
        let name = string(&gene["name"]);
        let long_name = opt_string(&gene["longName"]);
        for cat in array(&gene["geneCategoriesWithSources"]) {
            rows.push(GeneCategoryRecord {
                gene: name.clone(),
                full_name: long_name.clone(),
                category: string(&cat["name"]),
                sources: array(&cat["sourceNames"])
                    .iter()
                    .filter_map(|s| s.as_str().map(String::from))
                    .collect(),
            });
        }
    }
    Ok(rows)
}

pub fn sources(data: &Value) -> Result<Vec<SourceRecord>> {
    Ok(nodes(data, "sources")?
        .iter()
        .map(|s| SourceRecord {
            name: string(&s["fullName"]),
            short_name: string(&s["sourceDbName"]),
            version: opt_string(&s["sourceDbVersion"]),
            drug_claims: s["drugClaimsCount"].as_u64().unwrap_or(0),
            gene_claims: s["geneClaimsCount"].as_u64().unwrap_or(0),
            interaction_claims: s["interactionClaimsCount"].as_u64().unwrap_or(0),
        })
        .collect())
}

pub fn gene_list(data: &Value) -> Result<Vec<GeneListEntry>> {
    Ok(nodes(data, "genes")?
        .iter()
        .map(|g| GeneListEntry {
            name: string(&g["name"]),
            concept_id: string(&g["conceptId"]),
        })
        .collect())
}

pub fn drug_list(data: &Value) -> Result<Vec<DrugListEntry>> {
    Ok(nodes(data, "drugs")?
        .iter()
        .map(|d| DrugListEntry {
            name: string(&d["name"]),
            concept_id: string(&d["conceptId"]),
        })
        .collect())
}

/// `(drug name, normalised application number)` pairs.
pub fn drug_applications(data: &Value) -> Result<Vec<(String, String)>> {
    let mut rows = Vec::new();
    for drug in nodes(data, "drugs")? {
        let name = string(&drug["name"]);
        for app in array(&drug["drugApplications"]) {
            match app["appNo"].as_str().and_then(normalise_application_number) {
                Some(number) => rows.push((name.clone(), number)),
                None => tracing::warn!(drug = %name, app = %app, "Skipping unparseable application number"),
            }
        }
    }
    Ok(rows)
}

/// `"drugsatfda.nda:212099"` → `"NDA212099"`.
pub fn normalise_application_number(app_no: &str) -> Option<String> {
    let (_, rest) = app_no.split_once('.')?;
    let number: String = rest.chars().filter(|c| *c != ':').collect();
    if number.is_empty() {
        None
    } else {
        Some(number.to_uppercase())
    }
}
