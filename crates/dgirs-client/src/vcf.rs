//! Annotate variants from a VCF file with DGIdb interactions.
//!
//! Positions on the requested contig are mapped to overlapping genes through
//! Ensembl, the distinct gene names are then looked up in DGIdb.
//! Only uncompressed VCF text is read.

use dgirs_common::{Config, DgiError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::models::{InteractionFilters, InteractionRecord, SearchMode};
use crate::sources::ensembl::{EnsemblClient, MappedGene};
use crate::sources::InteractionSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub chromosome: String,
    pub pos: u64,
    pub ref_allele: String,
    pub alt: String,
    pub qual: String,
    pub filter: String,
}

/// Parse one tab-separated data line. Header lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<VariantRecord>> {
    if line.starts_with('#') || line.trim().is_empty() {
        return Ok(None);
    }
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 7 {
        return Err(DgiError::InvalidInput(format!(
            "VCF line has {} fields, expected at least 7",
            fields.len()
        )));
    }
    let pos = fields[1]
        .parse()
        .map_err(|_| DgiError::InvalidInput(format!("invalid VCF position '{}'", fields[1])))?;

    Ok(Some(VariantRecord {
        chromosome: fields[0].to_string(),
        pos,
        ref_allele: fields[3].to_string(),
        alt: fields[4].to_string(),
        qual: fields[5].to_string(),
        filter: fields[6].to_string(),
    }))
}

/// Records on `contig`, at most `limit` of them.
pub fn read_records<R: BufRead>(reader: R, contig: &str, limit: usize) -> Result<Vec<VariantRecord>> {
    let mut records = Vec::new();
    for line in reader.lines() {
        if records.len() >= limit {
            break;
        }
        if let Some(record) = parse_line(&line?)? {
            if record.chromosome == contig {
                records.push(record);
            }
        }
    }
    Ok(records)
}

pub fn read_file(path: &Path, contig: &str, limit: usize) -> Result<Vec<VariantRecord>> {
    let file = std::fs::File::open(path)?;
    read_records(std::io::BufReader::new(file), contig, limit)
}

/// Distinct, named genes in first-seen order.
pub fn distinct_gene_names(genes: &[MappedGene]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    genes
        .iter()
        .filter_map(|g| g.name.clone())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

pub struct VcfAnnotator<'a> {
    pub ensembl: &'a EnsemblClient,
    pub source: &'a dyn InteractionSource,
    pub record_limit: usize,
}

impl<'a> VcfAnnotator<'a> {
    pub fn new(ensembl: &'a EnsemblClient, source: &'a dyn InteractionSource, record_limit: usize) -> Self {
        Self { ensembl, source, record_limit }
    }

    /// Annotator reading at most `integrations.vcf_record_limit` records.
    pub fn from_config(
        ensembl: &'a EnsemblClient,
        source: &'a dyn InteractionSource,
        config: &Config,
    ) -> Self {
        Self::new(ensembl, source, config.integrations.vcf_record_limit)
    }

    /// Map variants on `contig` to genes and fetch their interactions.
    pub async fn annotate(&self, path: &Path, contig: &str) -> Result<Vec<InteractionRecord>> {
        let records = read_file(path, contig, self.record_limit)?;
        info!(n = records.len(), contig, "VCF records loaded");

        let mut mapped = Vec::new();
        for record in &records {
            match self.ensembl.genes_at(&record.chromosome, record.pos).await {
                Ok(genes) => mapped.extend(genes),
                Err(e) => warn!(pos = record.pos, error = %e, "Ensembl lookup failed"),
            }
        }

        let genes = distinct_gene_names(&mapped);
        debug!(n = genes.len(), "Genes mapped from variants");
        if genes.is_empty() {
            return Ok(Vec::new());
        }

        self.source
            .interactions(&genes, SearchMode::Genes, &InteractionFilters::default())
            .await
    }
}
