//! Validated JSON extraction
//!
//! Parses a request body and runs its schema validation in one step so that
//! every endpoint shares the same 400-family failures: malformed JSON maps
//! to `BadRequest`, schema violations to `ValidationError`.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that has passed schema validation.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|err: JsonRejection| AppError::BadRequest(err.body_text()))?;

        value
            .validate()
            .map_err(|err| AppError::Validation(err.to_string()))?;

        Ok(ValidatedJson(value))
    }
}
