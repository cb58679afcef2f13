//! Axum extractors for authentication
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::backend::AuthBackend;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::jwt::extract_bearer_token;

/// Authenticated member extractor (JWT)
#[derive(Debug)]
pub struct AuthMember(pub AuthContext);

impl<S> FromRequestParts<S> for AuthMember
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let backend = AuthBackend::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorization)?;

        let token = extract_bearer_token(auth_header)?;
        let auth_context = backend.authenticate_jwt(&token).await?;

        Ok(AuthMember(auth_context))
    }
}

/// Moderator extractor.
///
/// Like `AuthMember` but rejects members without the moderator role
/// with 403 FORBIDDEN.
#[derive(Debug)]
pub struct ModeratorMember(pub AuthContext);

impl<S> FromRequestParts<S> for ModeratorMember
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthMember(auth_context) = AuthMember::from_request_parts(parts, state).await?;

        if !auth_context.is_moderator() {
            return Err(AuthError::NotModerator);
        }

        Ok(ModeratorMember(auth_context))
    }
}
