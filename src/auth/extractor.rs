//! Axum extractors for authenticated users.

use super::TokenIssuer;
use crate::Error;
use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

/// Extractor that requires a valid Bearer access token.
///
/// # Example
///
/// ```ignore
/// async fn protected_handler(
///     RequireAuth(user_id): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}", user_id)
/// }
/// ```
pub struct RequireAuth(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    TokenIssuer: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(parts)?;
        let user_id = TokenIssuer::from_ref(state).validate(token)?;
        Ok(RequireAuth(user_id))
    }
}

/// Extract Bearer token from Authorization header.
fn extract_bearer_token(parts: &Parts) -> Result<&str, Error> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(Error::InvalidAuthentication)?;

    let value = header.to_str().map_err(|_| Error::InvalidAuthentication)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(Error::InvalidAuthentication)
}
