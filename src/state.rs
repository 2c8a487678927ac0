//! Shared application state.

use std::sync::Arc;

use crate::{
    auth::{password::PasswordHasher, token::TokenIssuer},
    store::AccountStore,
};

/// Everything a handler or the authorization guard needs, cloned per request.
///
/// None of it is mutable: the store owns its own consistency, the issuer and
/// hasher are configured once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub tokens: Arc<TokenIssuer>,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(store: Arc<dyn AccountStore>, tokens: TokenIssuer, passwords: PasswordHasher) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            passwords,
        }
    }
}
