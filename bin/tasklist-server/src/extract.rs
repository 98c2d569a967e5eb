//! Request extractors.
//!
//! Both wrap an axum extractor and turn its rejection into a [`ServerError`],
//! so malformed input is answered with the usual `{"error": ...}` body.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ServerError;
use crate::middleware::trace::MAX_REQUEST_BODY;

/// JSON body that has been decoded against its allow-list and checked
/// against its constraint table.
///
/// Decoding failures (malformed JSON, wrong content type, unknown or
/// mistyped fields) and constraint violations are both answered with 400 and
/// the handler never runs. Bodies over the size limit get 413.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    ServerError::PayloadTooLarge(MAX_REQUEST_BODY)
                } else {
                    ServerError::BadRequest(rejection.body_text())
                }
            })?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string decoded into `T`; a string that does not fit (wrong type,
/// repeated key) is a 400.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}
