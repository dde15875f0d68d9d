use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{error::AppError, models::User, store::Store};

/// The caller of a protected route, resolved from the raw `Authorization`
/// header value (the session token itself, no `Bearer` prefix).
///
/// Rejects with 401 when the header is missing or matches no session.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<Store> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, store: &Store) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        match store.resolve(token) {
            Ok(Some(user)) => Ok(AuthUser(user)),
            Ok(None) => Err(AppError::Unauthorized),
            Err(err) => Err(err.or_failed("Unauthorized")),
        }
    }
}
