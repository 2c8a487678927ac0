//! Account ownership guard.
//!
//! This middleware wraps every route addressed by an account id and admits a
//! request only when its token belongs to that account:
//! 1. Extract the token from the `x-jwt-token` header
//! 2. Validate its signature, algorithm and expiry
//! 3. Parse the account id from the path
//! 4. Load that account from the store
//! 5. Compare the account's number with the token's `accountNumber` claim
//! 6. Inject the verified identity into the request and call the handler
//!
//! Every failure produces the same 403 `{"error":"Permission denied"}`; the
//! failing step is only logged.

use axum::{
    extract::{Path, Request, State, rejection::PathRejection},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::{
    auth::{
        TOKEN_HEADER,
        token::{Claims, TokenError},
    },
    error::AppError,
    state::AppState,
    store::StoreError,
};

/// Identity attached to admitted requests.
///
/// Route handlers can extract it with `Extension<AuthContext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Storage id of the account named in the path
    pub account_id: i64,

    /// Account number proven by the token
    pub account_number: i64,
}

/// Why a request was refused. Logged, never returned to the client.
#[derive(Debug, thiserror::Error)]
enum Denial {
    #[error("missing or unreadable token header")]
    MissingToken,

    #[error("token rejected: {0}")]
    InvalidToken(#[from] TokenError),

    #[error("malformed account id")]
    MalformedId,

    #[error("account lookup failed: {0}")]
    AccountLookup(#[from] StoreError),

    #[error("token belongs to a different account")]
    AccountMismatch,
}

/// Ownership guard middleware function.
///
/// Applied with `route_layer(from_fn_with_state(state, require_account_owner))`
/// on routes with an `{id}` path parameter; the wrapped handlers are unaware of it.
///
/// # Returns
///
/// - `Ok(Response)` from the wrapped handler if the token owns the account
/// - `Err(AppError::PermissionDenied)` otherwise (403)
pub async fn require_account_owner(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let raw_id = id.ok().map(|Path(raw_id)| raw_id);

    let context = authorize(&state, request.headers(), raw_id.as_deref())
        .await
        .map_err(|denial| {
            tracing::debug!(reason = %denial, "Request denied");
            AppError::PermissionDenied
        })?;

    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

async fn authorize(
    state: &AppState,
    headers: &HeaderMap,
    raw_id: Option<&str>,
) -> Result<AuthContext, Denial> {
    // Step 1: Extract token header
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or(Denial::MissingToken)?;

    // Step 2: Validate token
    let Claims { account_number, .. } = state.tokens.validate(token)?;

    // Step 3: Resolve path id
    let account_id: i64 = raw_id
        .and_then(|raw| raw.parse().ok())
        .ok_or(Denial::MalformedId)?;

    // Step 4: Lookup account
    let account = state.store.get_account_by_id(account_id).await?;

    // Step 5: Bind token to account
    if account.number != account_number {
        return Err(Denial::AccountMismatch);
    }

    Ok(AuthContext {
        account_id: account.id,
        account_number,
    })
}
