//! Signed authorization tokens.
//!
//! Tokens are HS256 JWTs carrying the account number and an absolute expiry.
//! They are never stored server-side; every request is verified on its own.

use std::{fmt, time::Duration};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::models::account::Account;

/// The only signing algorithm accepted. Asymmetric and `none` tokens are rejected.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Name of [`ALGORITHM`] as it appears in a token header.
const ALGORITHM_NAME: &str = "HS256";

/// Claims embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "accountNumber")]
    pub account_number: i64,

    /// Expiry as seconds since the Unix epoch
    #[serde(rename = "expiresAt")]
    pub expires_at: i64,
}

/// The part of a JOSE header read before any verification.
///
/// `alg` stays a plain string so that names jsonwebtoken has no variant for,
/// `none` among them, are still recognized as an algorithm choice.
#[derive(Debug, Deserialize)]
struct RawHeader {
    alg: String,
}

impl RawHeader {
    fn parse(token: &str) -> Option<Self> {
        let (segment, _) = token.split_once('.')?;
        let bytes = URL_SAFE_NO_PAD.decode(segment).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Unsupported token algorithm")]
    UnsupportedAlgorithm,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

/// Mints and verifies tokens with a process-wide HMAC key.
///
/// Immutable after construction, so one instance is shared by every request.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &ALGORITHM)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &SecretString, lifetime: Duration) -> Self {
        let key = secret.expose_secret().as_bytes();

        // Expiry is checked against `expiresAt` in `validate`, not the registered `exp` claim
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            validation,
            lifetime,
        }
    }

    /// Issue a token bound to the account's number, valid for the configured lifetime.
    pub fn issue(&self, account: &Account) -> Result<String, TokenError> {
        let lifetime = i64::try_from(self.lifetime.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            account_number: account.number,
            expires_at: Utc::now().timestamp().saturating_add(lifetime),
        };
        self.sign(&claims)
    }

    /// Sign an arbitrary claim set.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(ALGORITHM), claims, &self.encoding_key).map_err(TokenError::Signing)
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// - `Malformed`: the header cannot be read, or the claims are missing or mistyped
    /// - `UnsupportedAlgorithm`: header names anything other than [`ALGORITHM`],
    ///   including `none` and names jsonwebtoken does not know
    /// - `InvalidSignature`: MAC does not match
    /// - `Expired`: `expiresAt` is not in the future
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let header = RawHeader::parse(token).ok_or(TokenError::Malformed)?;
        if header.alg != ALGORITHM_NAME {
            return Err(TokenError::UnsupportedAlgorithm);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(
            |error| match error.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::UnsupportedAlgorithm
                }
                _ => TokenError::Malformed,
            },
        )?;

        if data.claims.expires_at <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}
