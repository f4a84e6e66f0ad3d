/**
 * Bearer Token Extraction
 *
 * Reads the caller's session token from the `Authorization` header. Routes
 * that only optionally act on a token (logout) use [`BearerToken`] as an
 * infallible extractor: a missing or unreadable header yields `None`.
 *
 * Both `Authorization: Bearer <token>` and a bare `Authorization: <token>`
 * (the form PocketBase clients send) are accepted.
 */

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Optional session token presented by the caller
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BearerToken(pub Option<String>);

/// Token carried by an `Authorization` header, if any
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    // A scheme with nothing after it
    if value.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value,
    };
    (!token.is_empty()).then(|| token.to_string())
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers);
        if token.is_none() && parts.headers.contains_key(AUTHORIZATION) {
            tracing::debug!("Unreadable Authorization header ignored");
        }
        Ok(BearerToken(token))
    }
}
