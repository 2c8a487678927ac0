//! Account management HTTP handlers.
//!
//! This module implements the account-related API endpoints:
//! - GET /account - List all accounts
//! - POST /account - Create new account and issue its token
//! - GET /account/{id} - Get account by ID (guarded)
//! - DELETE /account/{id} - Delete account by ID (guarded)

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{AppendHeaders, IntoResponse},
};

use crate::{
    auth::TOKEN_HEADER,
    error::AppError,
    extract::ApiJson,
    middleware::auth::AuthContext,
    models::account::{AccountResponse, CreateAccountRequest, DeletedResponse, NewAccount},
    state::AppState,
};

/// Create a new account.
///
/// # Endpoint
///
/// `POST /account`
///
/// # Request Body
///
/// ```json
/// { "firstname": "A", "lastname": "B", "password": "secret" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: the created account, with the issued token in the
///   `x-jwt-token` response header
/// - **Error (400)**: undecodable body, empty field, hashing or store failure
///
/// The password is hashed on the blocking pool before anything is written, and
/// the account is persisted by a single insert.
pub async fn create_account(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateAccountRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_request(&request)?;

    let encrypted_password = state.passwords.hash(request.password).await?;

    let account = state
        .store
        .create_account(NewAccount {
            first_name: request.first_name,
            last_name: request.last_name,
            encrypted_password,
        })
        .await?;

    let token = state.tokens.issue(&account)?;

    tracing::info!(id = account.id, number = account.number, "Account created");

    Ok((
        AppendHeaders([(TOKEN_HEADER, token)]),
        Json(AccountResponse::from(account)),
    ))
}

/// Longest first or last name the `accounts` table stores (`VARCHAR(50)`).
pub const MAX_NAME_CHARS: usize = 50;

fn validate_create_request(request: &CreateAccountRequest) -> Result<(), AppError> {
    validate_name("firstname", &request.first_name)?;
    validate_name("lastname", &request.last_name)?;
    if request.password.is_empty() {
        return Err(AppError::Validation("password must not be empty".to_string()));
    }
    Ok(())
}

fn validate_name(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::Validation(format!(
            "{field} must be at most {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(())
}

/// Get a specific account by ID.
///
/// # Endpoint
///
/// `GET /account/{id}`
///
/// # Authentication
///
/// Runs behind the ownership guard: by the time this handler executes, the
/// token has been proven to belong to the account `id` names.
///
/// # Response
///
/// - **Success (200 OK)**: Returns account details
/// - **Error (403)**: Permission denied (from the guard)
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = state.store.get_account_by_id(id).await?;

    Ok(Json(account.into()))
}

/// List all accounts.
///
/// # Endpoint
///
/// `GET /account`
///
/// # Response
///
/// - **Success (200 OK)**: Returns array of accounts (may be empty), without
///   password hashes
/// - **Error (400)**: store failure
pub async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let accounts = state.store.get_accounts().await?;

    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Delete an account.
///
/// # Endpoint
///
/// `DELETE /account/{id}`
///
/// # Response
///
/// - **Success (200 OK)**: `{"deleted": id}`
/// - **Error (403)**: Permission denied (from the guard)
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, AppError> {
    state.store.delete_account(id).await?;

    tracing::info!(id, number = auth.account_number, "Account deleted");

    Ok(Json(DeletedResponse { deleted: id }))
}
