//! DGIdb GraphQL client.
//!
//! API: https://dgidb.org/api/graphql (overridable via config / DGIDB_API_URL)
//!
//! Each lookup binds variables into one of the fixed documents in
//! [`crate::queries`], issues a single request and hands the `data` member to
//! the matching normaliser.

use async_trait::async_trait;
use dgirs_common::{Config, DgiError, Result, SandboxClient};
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::{debug, info, instrument};

use super::openfda::OpenFdaClient;
use super::InteractionSource;
use crate::graphql::GraphQlClient;
use crate::models::{
    DrugApplicationRecord, DrugFilters, DrugListEntry, DrugRecord, GeneCategoryRecord, GeneListEntry,
    GeneRecord, InteractionFilters, InteractionRecord, SearchMode, SourceRecord, SourceType,
};
use crate::{normalise, queries};

pub struct DgidbClient {
    graphql: GraphQlClient,
    openfda: OpenFdaClient,
}

fn names_variable<T: AsRef<str>>(terms: &[T]) -> Result<Value> {
    if terms.is_empty() {
        return Err(DgiError::InvalidInput("at least one search term is required".into()));
    }
    Ok(Value::Array(terms.iter().map(|t| Value::String(t.as_ref().to_string())).collect()))
}

fn insert_opt<V: Into<Value>>(vars: &mut Map<String, Value>, key: &str, value: Option<V>) {
    if let Some(v) = value {
        vars.insert(key.to_string(), v.into());
    }
}

/// Variables for the interaction documents; unset filters are omitted.
pub fn interaction_variables<T: AsRef<str>>(terms: &[T], filters: &InteractionFilters) -> Result<Value> {
    let mut vars = Map::new();
    vars.insert("names".into(), names_variable(terms)?);
    insert_opt(&mut vars, "sourceDbName", filters.source.clone());
    insert_opt(&mut vars, "pmid", filters.pmid);
    insert_opt(&mut vars, "interactionType", filters.interaction_type.clone());
    insert_opt(&mut vars, "approved", filters.approved);
    insert_opt(&mut vars, "immunotherapy", filters.immunotherapy);
    insert_opt(&mut vars, "antiNeoplastic", filters.antineoplastic);
    Ok(Value::Object(vars))
}

impl DgidbClient {
    pub fn new(http: SandboxClient, endpoint: &str, openfda_url: &str) -> Result<Self> {
        Ok(Self {
            graphql: GraphQlClient::new(http.clone(), endpoint)?,
            openfda: OpenFdaClient::new(http, openfda_url)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let http = SandboxClient::with_timeout(Duration::from_secs(config.api.timeout_secs))?;
        info!(endpoint = %config.api.url, "Using DGIdb endpoint");
        Self::new(http, &config.api.url, &config.integrations.openfda_url)
    }

    pub fn endpoint(&self) -> &str {
        self.graphql.endpoint()
    }

    #[instrument(skip(self, terms))]
    pub async fn get_drugs<T: AsRef<str>>(&self, terms: &[T], filters: &DrugFilters) -> Result<Vec<DrugRecord>> {
        let mut vars = Map::new();
        vars.insert("names".into(), names_variable(terms)?);
        insert_opt(&mut vars, "immunotherapy", filters.immunotherapy);
        insert_opt(&mut vars, "antiNeoplastic", filters.antineoplastic);

        let data = self.graphql.execute("getDrugs", queries::GET_DRUGS, Value::Object(vars)).await?;
        normalise::drugs(&data)
    }

    #[instrument(skip(self, terms))]
    pub async fn get_genes<T: AsRef<str>>(&self, terms: &[T]) -> Result<Vec<GeneRecord>> {
        let vars = json!({ "names": names_variable(terms)? });
        let data = self.graphql.execute("getGenes", queries::GET_GENES, vars).await?;
        normalise::genes(&data)
    }

    #[instrument(skip(self, terms, filters))]
    pub async fn get_interactions<T: AsRef<str>>(
        &self,
        terms: &[T],
        mode: SearchMode,
        filters: &InteractionFilters,
    ) -> Result<Vec<InteractionRecord>> {
        let vars = interaction_variables(terms, filters)?;
        let rows = match mode {
            SearchMode::Genes => {
                let data = self.graphql
                    .execute("getInteractionsByGene", queries::GET_INTERACTIONS_BY_GENE, vars)
                    .await?;
                normalise::interactions_by_gene(&data)?
            }
            SearchMode::Drugs => {
                let data = self.graphql
                    .execute("getInteractionsByDrug", queries::GET_INTERACTIONS_BY_DRUG, vars)
                    .await?;
                normalise::interactions_by_drug(&data)?
            }
        };
        debug!(n = rows.len(), %mode, "Interactions retrieved");
        Ok(rows)
    }

    #[instrument(skip(self, terms))]
    pub async fn get_categories<T: AsRef<str>>(&self, terms: &[T]) -> Result<Vec<GeneCategoryRecord>> {
        let vars = json!({ "names": names_variable(terms)? });
        let data = self.graphql.execute("getGeneCategories", queries::GET_GENE_CATEGORIES, vars).await?;
        normalise::gene_categories(&data)
    }

    /// Aggregate sources, optionally restricted to one source type.
    #[instrument(skip(self))]
    pub async fn get_sources(&self, source_type: Option<SourceType>) -> Result<Vec<SourceRecord>> {
        let vars = match source_type {
            Some(st) => json!({ "sourceType": st.as_graphql() }),
            None => json!({}),
        };
        let data = self.graphql.execute("getSources", queries::GET_SOURCES, vars).await?;
        normalise::sources(&data)
    }

    #[instrument(skip(self))]
    pub async fn get_all_genes(&self) -> Result<Vec<GeneListEntry>> {
        let data = self.graphql.execute("getAllGenes", queries::GET_ALL_GENES, json!({})).await?;
        normalise::gene_list(&data)
    }

    #[instrument(skip(self))]
    pub async fn get_all_drugs(&self) -> Result<Vec<DrugListEntry>> {
        let data = self.graphql.execute("getAllDrugs", queries::GET_ALL_DRUGS, json!({})).await?;
        normalise::drug_list(&data)
    }

    /// ANDA/NDA applications for the given drugs, expanded into drugs@FDA
    /// product rows.
    #[instrument(skip(self, terms))]
    pub async fn get_drug_applications<T: AsRef<str>>(&self, terms: &[T]) -> Result<Vec<DrugApplicationRecord>> {
        let vars = json!({ "names": names_variable(terms)? });
        let data = self.graphql
            .execute("getDrugApplications", queries::GET_DRUG_APPLICATIONS, vars)
            .await?;

        let mut rows = Vec::new();
        for (name, application) in normalise::drug_applications(&data)? {
            for product in self.openfda.products(&application).await? {
                rows.push(DrugApplicationRecord {
                    name: name.clone(),
                    application: application.clone(),
                    brand_name: product.brand_name,
                    marketing_status: product.marketing_status,
                    dosage_form: product.dosage_form,
                    dosage_strength: product.dosage_strength,
                });
            }
        }
        Ok(rows)
    }
}

#[async_trait]
impl InteractionSource for DgidbClient {
    async fn interactions(
        &self,
        terms: &[String],
        mode: SearchMode,
        filters: &InteractionFilters,
    ) -> Result<Vec<InteractionRecord>> {
        self.get_interactions(terms, mode, filters).await
    }

    async fn gene_list(&self) -> Result<Vec<GeneListEntry>> {
        self.get_all_genes().await
    }

    async fn drug_list(&self) -> Result<Vec<DrugListEntry>> {
        self.get_all_drugs().await
    }
}
