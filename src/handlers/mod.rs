// handlers/mod.rs - two handler tiers
//
// public:    no token required (/account, /health)
// protected: wrapped by the access gate (/account/:id, /transfer)
pub mod protected;
pub mod public;

use axum::{extract::rejection::JsonRejection, Json};

use crate::error::ApiError;

/// Unwrap a JSON body, turning any rejection into a 400.
pub(crate) fn read_json<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            tracing::debug!("Rejected request body: {}", rejection);
            Err(ApiError::bad_request("invalid request body"))
        }
    }
}

/// Router fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::not_found("not found")
}

/// Method fallback for known paths
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
