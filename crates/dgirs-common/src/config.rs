//! Configuration loading for dgirs.
//! Reads dgirs.toml from the current directory or the path in DGIRS_CONFIG.

use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::DgiError;

pub const DEFAULT_API_URL: &str = "https://dgidb.org/api/graphql";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub integrations: IntegrationsConfig,
    #[serde(default)]
    pub web: WebConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url()      -> String { DEFAULT_API_URL.to_string() }
fn default_timeout_secs() -> u64    { 30 }

impl Default for ApiConfig {
    fn default() -> Self {
        Self { url: default_api_url(), timeout_secs: default_timeout_secs() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationsConfig {
    #[serde(default = "default_openfda_url")]
    pub openfda_url: String,
    #[serde(default = "default_clinical_trials_url")]
    pub clinical_trials_url: String,
    #[serde(default = "default_ensembl_url")]
    pub ensembl_url: String,
    /// Maximum number of VCF records mapped per annotation run.
    #[serde(default = "default_vcf_record_limit")]
    pub vcf_record_limit: usize,
}

fn default_openfda_url()         -> String { "https://api.fda.gov/drug/drugsfda.json".to_string() }
fn default_clinical_trials_url() -> String { "https://clinicaltrials.gov/api/v2/studies".to_string() }
fn default_ensembl_url()         -> String { "https://rest.ensembl.org".to_string() }
fn default_vcf_record_limit()    -> usize  { 1500 }

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            openfda_url: default_openfda_url(),
            clinical_trials_url: default_clinical_trials_url(),
            ensembl_url: default_ensembl_url(),
            vcf_record_limit: default_vcf_record_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16    { 3001 }

impl Default for WebConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

impl Config {
    /// Load configuration from dgirs.toml.
    ///
    /// An explicit `DGIRS_CONFIG` path must exist; a missing `dgirs.toml` in
    /// the working directory falls back to defaults. Environment overrides
    /// are applied last.
    pub fn load() -> Result<Self, DgiError> {
        let mut config = match std::env::var("DGIRS_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) if Path::new("dgirs.toml").exists() => Self::from_file(Path::new("dgirs.toml"))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, DgiError> {
        if !path.exists() {
            return Err(DgiError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DgiError> {
        toml::from_str(content).map_err(|e| DgiError::Config(e.to_string()))
    }

    /// Apply `DGIDB_API_URL` and `DGIRS_WEB_PORT` from the given lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DGIDB_API_URL").filter(|u| !u.is_empty()) {
            self.api.url = url;
        }
        if let Some(port) = lookup("DGIRS_WEB_PORT") {
            match port.parse() {
                Ok(p) => self.web.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid DGIRS_WEB_PORT"),
            }
        }
    }
}
