/**
 * Lenient JSON Bodies
 *
 * The auth and room routes report absent input as their own validation
 * error (`400 {"error": ...}`) instead of axum's plain-text JSON rejection.
 * [`LenientJson`] therefore never rejects: a missing content type, a body
 * that is not JSON, or a mistyped field all yield `T::default()`, whose
 * empty fields then fail the route's required-field check.
 */

use std::convert::Infallible;

use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::de::DeserializeOwned;

/// JSON body, or `T::default()` when it cannot be read
#[derive(Debug, Clone, Default)]
pub struct LenientJson<T>(pub T);

impl<T, S> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(LenientJson(value)),
            Err(rejection) => {
                tracing::debug!(%rejection, "Unreadable JSON body, using empty request");
                Ok(LenientJson(T::default()))
            }
        }
    }
}
