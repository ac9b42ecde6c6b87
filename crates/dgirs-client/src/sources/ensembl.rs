//! Ensembl REST client for mapping genomic positions to genes.
//!
//! Endpoint: https://rest.ensembl.org/overlap/region/human/{chr}:{start}-{end}?feature=gene

use dgirs_common::{Config, Result, SandboxClient};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// A gene overlapping a queried position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedGene {
    pub name: Option<String>,
    pub description: Option<String>,
    pub gene_id: String,
}

pub struct EnsemblClient {
    client: SandboxClient,
    base_url: String,
}

impl EnsemblClient {
    pub fn new(mut client: SandboxClient, base_url: &str) -> Result<Self> {
        client.allow_url(base_url)?;
        Ok(Self { client, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let http = SandboxClient::with_timeout(Duration::from_secs(config.api.timeout_secs))?;
        info!(endpoint = %config.integrations.ensembl_url, "Using Ensembl endpoint");
        Self::new(http, &config.integrations.ensembl_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self))]
    pub async fn genes_at(&self, chromosome: &str, position: u64) -> Result<Vec<MappedGene>> {
        let url = format!(
            "{}/overlap/region/human/{}:{}-{}",
            self.base_url,
            ensembl_region_name(chromosome),
            position,
            position
        );

        let json: Value = self.client
            .get(&url)?
            .query(&[("feature", "gene")])
            .header("Content-Type", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let genes = parse_overlap(&json);
        debug!(n = genes.len(), "Overlapping genes retrieved");
        Ok(genes)
    }
}

/// Ensembl names chromosomes without the UCSC `chr` prefix.
pub fn ensembl_region_name(chromosome: &str) -> &str {
    chromosome.strip_prefix("chr").unwrap_or(chromosome)
}

pub fn parse_overlap(json: &Value) -> Vec<MappedGene> {
    json.as_array()
        .map(|features| {
            features
                .iter()
                .filter(|f| f["feature_type"].as_str() == Some("gene"))
                .filter_map(|f| {
                    Some(MappedGene {
                        name: f["external_name"].as_str().map(String::from),
                        description: f["description"].as_str().map(String::from),
                        gene_id: f["gene_id"].as_str()?.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}
