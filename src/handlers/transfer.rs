//! Fund transfer endpoint.
//!
//! Accepts a transfer request and echoes it back. No balance is read or
//! written and no authorization is applied.

use axum::Json;

use crate::{error::AppError, extract::ApiJson, models::transfer::TransferRequest};

/// Accept a transfer request.
///
/// # Endpoint
///
/// `POST /transfer`
///
/// # Response
///
/// - **Success (200 OK)**: the decoded request, unchanged
/// - **Error (400)**: undecodable body
pub async fn create_transfer(
    ApiJson(request): ApiJson<TransferRequest>,
) -> Result<Json<TransferRequest>, AppError> {
    tracing::info!(
        to_account = %request.to_account,
        amount = request.amount,
        "Transfer received"
    );

    Ok(Json(request))
}
