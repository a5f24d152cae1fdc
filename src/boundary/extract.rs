//! Axum extractor running validation before the handler body
//!
//! ```ignore
//! impl Dto for Contact {
//!     const SCHEMA_ID: &'static str = "contact";
//!     const SCHEMA_VERSION: &'static str = "1";
//! }
//!
//! async fn create(Validated(contact): Validated<Contact>) -> StatusCode { .. }
//! ```

use axum::extract::{FromRef, FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::errors::BoundaryError;
use super::state::Boundary;
use crate::observability::{Event, Logger};

/// A typed handler input bound to a registered schema
pub trait Dto: DeserializeOwned + Send {
    const SCHEMA_ID: &'static str;
    const SCHEMA_VERSION: &'static str;
}

/// JSON body validated against `T`'s schema and deserialized into `T`
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: Dto,
    Boundary: FromRef<S>,
{
    type Rejection = BoundaryError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                let reason = rejection.body_text();
                Logger::info(
                    Event::MalformedPayload.as_str(),
                    &[("schema_id", T::SCHEMA_ID), ("reason", reason.as_str())],
                );
                BoundaryError::malformed(reason)
            })?;

        let boundary = Boundary::from_ref(state);
        boundary
            .parse::<T>(T::SCHEMA_ID, T::SCHEMA_VERSION, &payload)
            .await
            .map(Validated)
    }
}
