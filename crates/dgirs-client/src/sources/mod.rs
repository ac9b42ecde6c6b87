//! Remote data source clients.

pub mod clinicaltrials;
pub mod dgidb;
pub mod ensembl;
pub mod openfda;

use async_trait::async_trait;
use dgirs_common::Result;

use crate::models::{DrugListEntry, GeneListEntry, InteractionFilters, InteractionRecord, SearchMode};

/// The slice of DGIdb the dashboard and annotators depend on.
#[async_trait]
pub trait InteractionSource: Send + Sync {
    /// Interactions for the given genes or drugs, one row per interaction.
    async fn interactions(
        &self,
        terms: &[String],
        mode: SearchMode,
        filters: &InteractionFilters,
    ) -> Result<Vec<InteractionRecord>>;

    /// Every gene name known to the database.
    async fn gene_list(&self) -> Result<Vec<GeneListEntry>>;

    /// Every drug name known to the database.
    async fn drug_list(&self) -> Result<Vec<DrugListEntry>>;
}
