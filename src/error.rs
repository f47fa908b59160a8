use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Error response type
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Failures surfaced by the API handlers
///
/// The kind of error does not decide the HTTP status: each handler picks the
/// status code for its own failures (see [`crate::handlers`]). This type only
/// carries the message that ends up in the JSON error body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Requested key does not exist in the store
    #[error("No item found with uuid {0}")]
    NotFound(String),
    /// Missing or unusable input
    #[error("Bad request: {0}")]
    BadRequest(String),
    /// Store call failed for any reason other than a missing key
    #[error("Store error: {0}")]
    StoreFailure(String),
    /// Request body is not valid JSON for the expected payload
    #[error("JSON parse error: {0}")]
    ParseFailure(#[from] serde_json::Error),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { uuid } => ApiError::NotFound(uuid),
            other => ApiError::StoreFailure(other.to_string()),
        }
    }
}
