//! JSON body extractor with uniform 400 rejections.
//!
//! Axum's built-in `Json` extractor answers schema violations with 422 and
//! its own body format. This wrapper routes every rejection through
//! [`AppError::Validation`] instead, so malformed bodies surface as
//! `400 {"error": "..."}` like every other validation failure.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};

use crate::http::error::AppError;

/// Drop-in replacement for `axum::Json` on the extraction side.
pub struct Json<T>(pub T);

impl<S, T> FromRequest<S> for Json<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Json(value)),
            Err(rejection) => Err(AppError::Validation(rejection.body_text())),
        }
    }
}
