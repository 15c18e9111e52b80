use axum::{extract::rejection::JsonRejection, Json};

use crate::database::models::TransferRequest;
use crate::error::ApiError;
use crate::handlers::read_json;

/// POST /transfer - echo the parsed request
pub async fn transfer(payload: Result<Json<TransferRequest>, JsonRejection>) -> Result<Json<TransferRequest>, ApiError> {
    let request = read_json(payload)?;
    Ok(Json(request))
}
