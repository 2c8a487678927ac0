//! Request extractors that report failures as [`AppError`].

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use crate::error::AppError;

/// JSON body extractor.
///
/// Behaves like [`axum::Json`], but any decoding failure (bad syntax, wrong
/// content type, missing fields) becomes [`AppError::Decode`], so clients get
/// the same 400 `{"error": ...}` envelope as every other failure.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| AppError::Decode(rejection.body_text()))?;
        Ok(Self(value))
    }
}
