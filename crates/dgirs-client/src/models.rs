//! Row types produced by the response normaliser.

use dgirs_common::DgiError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Attribute name → values, in first-seen order per name.
pub type Attributes = BTreeMap<String, Vec<String>>;

/// Which side of the interaction the search terms name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Genes,
    Drugs,
}

impl SearchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Genes => "genes",
            SearchMode::Drugs => "drugs",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = DgiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "genes" => Ok(SearchMode::Genes),
            "drugs" => Ok(SearchMode::Drugs),
            other => Err(DgiError::InvalidInput(format!(
                "Search type must be 'drugs' or 'genes', got '{}'",
                other
            ))),
        }
    }
}

/// Source categories accepted by the `sources` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Drug,
    Gene,
    Interaction,
    PotentiallyDruggable,
}

impl SourceType {
    /// Enum literal expected by the GraphQL schema.
    pub fn as_graphql(&self) -> &'static str {
        match self {
            SourceType::Drug                 => "DRUG",
            SourceType::Gene                 => "GENE",
            SourceType::Interaction          => "INTERACTION",
            SourceType::PotentiallyDruggable => "POTENTIALLY_DRUGGABLE",
        }
    }
}

impl FromStr for SourceType {
    type Err = DgiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drug" => Ok(SourceType::Drug),
            "gene" => Ok(SourceType::Gene),
            "interaction" => Ok(SourceType::Interaction),
            "potentially_druggable" => Ok(SourceType::PotentiallyDruggable),
            other => Err(DgiError::InvalidInput(format!("Unknown source type '{}'", other))),
        }
    }
}

/// One observed drug-gene interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub gene_name: String,
    pub gene_long_name: Option<String>,
    pub drug_name: String,
    pub approved: Option<bool>,
    pub interaction_score: Option<f64>,
    pub interaction_attributes: Attributes,
    pub sources: Vec<String>,
    pub pmids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalRating {
    pub rating: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugRecord {
    pub name: String,
    pub concept_id: String,
    pub aliases: Vec<String>,
    pub attributes: Attributes,
    pub antineoplastic: Option<bool>,
    pub immunotherapy: Option<bool>,
    pub approved: Option<bool>,
    pub approval_ratings: Vec<ApprovalRating>,
    pub fda_applications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneRecord {
    pub name: String,
    pub concept_id: String,
    pub aliases: Vec<String>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneCategoryRecord {
    pub gene: String,
    pub full_name: Option<String>,
    pub category: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub name: String,
    pub short_name: String,
    pub version: Option<String>,
    pub drug_claims: u64,
    pub gene_claims: u64,
    pub interaction_claims: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneListEntry {
    pub name: String,
    pub concept_id: String,
}

/// Rows of the drug list have the same shape as gene list rows.
pub type DrugListEntry = GeneListEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugApplicationRecord {
    pub name: String,
    pub application: String,
    pub brand_name: String,
    pub marketing_status: String,
    pub dosage_form: String,
    pub dosage_strength: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalTrialRecord {
    pub drug_name: String,
    pub trial_id: String,
    pub brief: String,
    pub study_type: Option<String>,
    pub min_age: Option<String>,
    pub max_age: Option<String>,
    pub age_groups: Vec<String>,
    pub pediatric: bool,
    pub conditions: Vec<String>,
    pub interventions: Vec<String>,
}

/// Optional filters for interaction lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InteractionFilters {
    pub source: Option<String>,
    pub pmid: Option<i64>,
    pub interaction_type: Option<String>,
    pub approved: Option<bool>,
    pub immunotherapy: Option<bool>,
    pub antineoplastic: Option<bool>,
}

/// Optional filters for drug record lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugFilters {
    pub immunotherapy: Option<bool>,
    pub antineoplastic: Option<bool>,
}
