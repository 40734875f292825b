use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Request-level lookup failures. None of these are fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Invalid category")]
    InvalidCategory(String),

    /// The identifying column configured for a category is absent from its table.
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    #[error("No match found for '{pathogen}' in {category} dataset.")]
    NotFound { pathogen: String, category: String },
}

impl QueryError {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidCategory(_) | Self::MissingColumn(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
