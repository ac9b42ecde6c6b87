//! GraphQL transport: POSTs a fixed document with variable bindings and
//! unwraps the `data` member of the response.

use dgirs_common::{DgiError, Result, SandboxClient};
use serde_json::{json, Value};
use tracing::{debug, instrument};

#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: SandboxClient,
    endpoint: String,
}

impl GraphQlClient {
    /// Build a client for `endpoint`, adding its host to the sandbox allowlist.
    pub fn new(mut http: SandboxClient, endpoint: &str) -> Result<Self> {
        http.allow_url(endpoint)?;
        Ok(Self { http, endpoint: endpoint.to_string() })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[instrument(skip(self, query, variables), fields(endpoint = %self.endpoint))]
    pub async fn execute(&self, operation: &str, query: &str, variables: Value) -> Result<Value> {
        debug!(%variables, "Issuing GraphQL request");

        let body = self.http
            .post(&self.endpoint)?
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        extract_data(body)
    }
}

/// Unwrap `data` from a GraphQL response body, surfacing any `errors`.
pub fn extract_data(mut body: Value) -> Result<Value> {
    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let messages = errors
                .iter()
                .map(|e| {
                    e["message"]
                        .as_str()
                        .map(String::from)
                        .unwrap_or_else(|| e.to_string())
                })
                .collect();
            return Err(DgiError::GraphQl(messages));
        }
    }

    match body.get_mut("data").map(Value::take) {
        Some(data) if !data.is_null() => Ok(data),
        _ => Err(DgiError::UnexpectedResponse("response has no `data` member".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_data() {
        let data = extract_data(json!({ "data": { "genes": { "nodes": [] } } })).unwrap();
        assert_eq!(data, json!({ "genes": { "nodes": [] } }));
    }

    #[test]
    fn test_errors_take_precedence() {
        let err = extract_data(json!({
            "data": null,
            "errors": [{ "message": "Field 'foo' doesn't exist on type 'Gene'" }]
        }))
        .unwrap_err();
        match err {
            DgiError::GraphQl(messages) => {
                assert_eq!(messages, vec!["Field 'foo' doesn't exist on type 'Gene'".to_string()])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_data_is_unexpected() {
        assert!(matches!(
            extract_data(json!({ "errors": [] })),
            Err(DgiError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_new_allows_custom_endpoint() {
        let client = GraphQlClient::new(
            SandboxClient::new().unwrap(),
            "https://dgidb.internal.lab/api/graphql",
        )
        .unwrap();
        assert_eq!(client.endpoint(), "https://dgidb.internal.lab/api/graphql");
    }
}
