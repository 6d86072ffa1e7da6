//! Error types for the HTTP layer.
//!
//! [`ApiError`] converts into an Axum response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. The body
//! is always `{"error": "<message>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog_store::QueryError;

/// Errors returned by API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A query against the snapshot failed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The product id in the path was not an integer.
    #[error("invalid product id {0}")]
    InvalidId(String),
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Query(QueryError::NotReady) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Query(QueryError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Query(QueryError::BadRequest(_)) | Self::InvalidId(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self.to_string() });

        (status, axum::Json(body)).into_response()
    }
}
