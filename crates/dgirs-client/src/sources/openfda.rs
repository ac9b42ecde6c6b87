//! openFDA drugs@FDA client.
//!
//! Endpoint: https://api.fda.gov/drug/drugsfda.json
//! One product row per (brand, marketing status, dosage form, strength).

use dgirs_common::{Result, SandboxClient};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FdaProduct {
    pub brand_name: String,
    pub marketing_status: String,
    pub dosage_form: String,
    pub dosage_strength: String,
}

pub struct OpenFdaClient {
    client: SandboxClient,
    base_url: String,
}

impl OpenFdaClient {
    /// Build a client for `base_url`, adding its host to the sandbox allowlist.
    pub fn new(mut client: SandboxClient, base_url: &str) -> Result<Self> {
        client.allow_url(base_url)?;
        Ok(Self { client, base_url: base_url.to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Products registered under an application number such as `NDA212099`.
    /// An unknown application yields no products.
    #[instrument(skip(self))]
    pub async fn products(&self, application_number: &str) -> Result<Vec<FdaProduct>> {
        let search = format!("openfda.application_number:\"{}\"", application_number);
        let resp = self.client
            .get(&self.base_url)?
            .query(&[("search", search.as_str())])
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            warn!(application_number, "No drugs@FDA record found");
            return Ok(Vec::new());
        }

        let json: Value = resp.error_for_status()?.json().await?;
        let products = parse_products(&json);
        debug!(n = products.len(), "drugs@FDA products retrieved");
        Ok(products)
    }
}

pub fn parse_products(json: &Value) -> Vec<FdaProduct> {
    json["results"][0]["products"]
        .as_array()
        .map(|products| {
            products
                .iter()
                .map(|p| FdaProduct {
                    brand_name: p["brand_name"].as_str().unwrap_or("").to_string(),
                    marketing_status: p["marketing_status"].as_str().unwrap_or("").to_string(),
                    dosage_form: p["dosage_form"].as_str().unwrap_or("").to_string(),
                    dosage_strength: p["active_ingredients"][0]["strength"]
                        .as_str()
                        .unwrap_or("")
                        .to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_products() {
        let json = json!({
            "results": [{
                "application_number": "NDA212099",
                "products": [{
                    "brand_name": "NUBEQA",
                    "marketing_status": "Prescription",
                    "dosage_form": "TABLET",
                    "active_ingredients": [{ "name": "DAROLUTAMIDE", "strength": "300MG" }]
                }]
            }]
        });
        let products = parse_products(&json);
        assert_eq!(products, vec![FdaProduct {
            brand_name: "NUBEQA".into(),
            marketing_status: "Prescription".into(),
            dosage_form: "TABLET".into(),
            dosage_strength: "300MG".into(),
        }]);
    }

    #[test]
    fn test_parse_products_without_results() {
        assert!(parse_products(&json!({ "error": { "code": "NOT_FOUND" } })).is_empty());
    }

    #[test]
    fn test_new_allows_mirror_host() {
        let url = "http://fda-mirror.internal.lab/drug/drugsfda.json";
        let client = OpenFdaClient::new(SandboxClient::new().unwrap(), url).unwrap();
        assert!(client.client.is_allowed(url));
        assert!(client.client.get(url).is_ok());
        assert_eq!(client.base_url(), url);
    }

    #[test]
    fn test_new_rejects_url_without_host() {
        let err = OpenFdaClient::new(SandboxClient::new().unwrap(), "drugsfda.json").err().unwrap();
        assert!(matches!(err, dgirs_common::DgiError::Config(_)));
    }
}
