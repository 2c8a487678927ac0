//! Login endpoint: exchange an account number and password for a token.

use axum::{Json, extract::State};

use crate::{
    error::AppError,
    extract::ApiJson,
    models::login::{LoginRequest, LoginResponse},
    state::AppState,
};

/// Log in to an existing account.
///
/// # Endpoint
///
/// `POST /login`
///
/// # Response
///
/// - **Success (200 OK)**: `{"number": ..., "token": ...}`
/// - **Error (400)**: undecodable body
/// - **Error (403)**: unknown account number or wrong password
///
/// An unknown number and a wrong password are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let account = state
        .store
        .get_account_by_number(request.number)
        .await
        .map_err(|error| {
            tracing::debug!(%error, "Login lookup failed");
            AppError::PermissionDenied
        })?;

    let verified = state
        .passwords
        .verify(request.password, account.encrypted_password.clone())
        .await
        .map_err(|error| {
            tracing::warn!(%error, id = account.id, "Stored password hash unusable");
            AppError::PermissionDenied
        })?;

    if !verified {
        tracing::debug!(id = account.id, "Login password mismatch");
        return Err(AppError::PermissionDenied);
    }

    let token = state.tokens.issue(&account)?;

    Ok(Json(LoginResponse {
        number: account.number,
        token,
    }))
}
