use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DgiError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("GraphQL error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Security error: {0}")]
    SecurityError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DgiError>;

/// Error returned from HTTP handlers, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_)   => StatusCode::NOT_FOUND,
            ApiError::Upstream(_)   => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_)   => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DgiError> for ApiError {
    fn from(err: DgiError) -> Self {
        match err {
            DgiError::InvalidInput(msg) => ApiError::BadRequest(msg),
            DgiError::Http(_) | DgiError::GraphQl(_) | DgiError::UnexpectedResponse(_) => {
                ApiError::Upstream(err.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_errors_are_joined() {
        let err = DgiError::GraphQl(vec!["bad field".into(), "bad arg".into()]);
        assert_eq!(err.to_string(), "GraphQL error: bad field; bad arg");
    }

    #[test]
    fn test_api_error_status_mapping() {
        let bad: ApiError = DgiError::InvalidInput("no terms".into()).into();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let upstream: ApiError = DgiError::GraphQl(vec!["boom".into()]).into();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let internal: ApiError = DgiError::Config("missing".into()).into();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
