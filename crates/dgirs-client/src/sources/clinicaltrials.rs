//! ClinicalTrials.gov v2 API client.
//!
//! API docs: https://clinicaltrials.gov/data-api/api
//! Endpoint: https://clinicaltrials.gov/api/v2/studies
//!
//! Studies are looked up by intervention (`query.intr`) and flattened into
//! one `ClinicalTrialRecord` per study:
//!   - drug_name     = search term, upper-cased
//!   - trial_id      = NCT id
//!   - pediatric     = `CHILD` among the standard age groups

use dgirs_common::{Config, DgiError, Result, SandboxClient};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::models::ClinicalTrialRecord;

pub struct ClinicalTrialsClient {
    client: SandboxClient,
    base_url: String,
}

impl ClinicalTrialsClient {
    pub fn new(mut client: SandboxClient, base_url: &str) -> Result<Self> {
        client.allow_url(base_url)?;
        Ok(Self { client, base_url: base_url.to_string() })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let http = SandboxClient::with_timeout(Duration::from_secs(config.api.timeout_secs))?;
        info!(endpoint = %config.integrations.clinical_trials_url, "Using ClinicalTrials.gov endpoint");
        Self::new(http, &config.integrations.clinical_trials_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn search_studies(&self, intervention: &str) -> Result<Vec<Value>> {
        let resp = self.client
            .get(&self.base_url)?
            .query(&[
                ("format",     "json"),
                ("query.intr", intervention),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(resp["studies"]
            .as_array()
            .cloned()
            .unwrap_or_default())
    }

    /// Trials for every drug term, in term order.
    #[instrument(skip(self))]
    pub async fn get_clinical_trials(&self, terms: &[String]) -> Result<Vec<ClinicalTrialRecord>> {
        if terms.is_empty() {
            return Err(DgiError::InvalidInput(
                "Must supply a nonempty list of drug terms".into(),
            ));
        }

        let mut records = Vec::new();
        for drug in terms {
            let studies = self.search_studies(drug).await?;
            debug!(drug = %drug, n = studies.len(), "ClinicalTrials.gov studies retrieved");
            records.extend(studies.iter().map(|s| parse_study(drug, s)));
        }
        Ok(records)
    }
}

pub fn parse_study(drug: &str, study: &Value) -> ClinicalTrialRecord {
    let proto = &study["protocolSection"];
    let id_mod = &proto["identificationModule"];
    let design_mod = &proto["designModule"];
    let elig_mod = &proto["eligibilityModule"];
    let cond_mod = &proto["conditionsModule"];
    let interv_mod = &proto["armsInterventionsModule"];

    let age_groups: Vec<String> = elig_mod["stdAges"]
        .as_array()
        .map(|a| a.iter().filter_map(|v| v.as_str()).map(String::from).collect())
        .unwrap_or_default();

    ClinicalTrialRecord {
        drug_name:  drug.to_uppercase(),
        trial_id:   id_mod["nctId"].as_str().unwrap_or("").to_string(),
        brief:      id_mod["briefTitle"].as_str().unwrap_or("").to_string(),
        study_type: design_mod["studyType"].as_str().map(String::from),
        min_age:    elig_mod["minimumAge"].as_str().map(String::from),
        max_age:    elig_mod["maximumAge"].as_str().map(String::from),
        pediatric:  age_groups.iter().any(|g| g == "CHILD"),
        age_groups,
        conditions: cond_mod["conditions"]
            .as_array()
            .map(|c| c.iter().filter_map(|v| v.as_str()).map(String::from).collect())
            .unwrap_or_default(),
        interventions: interv_mod["interventions"]
            .as_array()
            .map(|iv| iv.iter().filter_map(|v| v["name"].as_str()).map(String::from).collect())
            .unwrap_or_default(),
    }
}
