use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::DgiError;

/// Hosts every dgirs client is allowed to reach out of the box.
const DEFAULT_ALLOWLIST: &[&str] = &[
    "dgidb.org",          // DGIdb GraphQL
    "api.fda.gov",        // openFDA drugs@FDA
    "clinicaltrials.gov", // ClinicalTrials.gov v2
    "rest.ensembl.org",   // Ensembl overlap lookups
    "localhost",
    "127.0.0.1",
];

/// An HTTP client that only allows requests to approved domains.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with the default allowlist and a 30 second timeout.
    pub fn new() -> Result<Self, DgiError> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DgiError> {
        let allowlist = DEFAULT_ALLOWLIST.iter().map(|d| d.to_string()).collect();

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("dgirs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Allows the host of a configured endpoint URL (e.g. a self-hosted DGIdb).
    pub fn allow_url(&mut self, url: &str) -> Result<(), DgiError> {
        let parsed = Url::parse(url)
            .map_err(|e| DgiError::Config(format!("invalid URL {}: {}", url, e)))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| DgiError::Config(format!("URL has no host: {}", url)))?;
        self.allow_domain(host);
        Ok(())
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        // Exact match or a subdomain of an allowed domain
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }

    fn check(&self, url: &str) -> Result<(), DgiError> {
        if self.is_allowed(url) {
            Ok(())
        } else {
            Err(DgiError::SecurityError(format!(
                "Network capabilities capped: domain not in allowlist for URL {}",
                url
            )))
        }
    }

    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, DgiError> {
        self.check(url)?;
        Ok(self.client.get(url))
    }

    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, DgiError> {
        self.check(url)?;
        Ok(self.client.post(url))
    }
}
