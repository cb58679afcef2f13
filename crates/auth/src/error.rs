//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    MissingAuthorization,
    InvalidAuthorizationFormat,
    InvalidToken,
    InvalidMemberId,
    MemberNotFound,
    MemberLoadError,
    /// Member lacks the moderator role
    NotModerator,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingAuthorization => (
                StatusCode::UNAUTHORIZED,
                "MISSING_AUTHORIZATION",
                "Authorization header required",
            ),
            AuthError::InvalidAuthorizationFormat => (
                StatusCode::UNAUTHORIZED,
                "INVALID_AUTHORIZATION",
                "Invalid authorization header format",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or expired token",
            ),
            AuthError::InvalidMemberId => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid member ID in token",
            ),
            AuthError::MemberNotFound => (
                StatusCode::UNAUTHORIZED,
                "MEMBER_NOT_FOUND",
                "Member not found",
            ),
            AuthError::MemberLoadError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "MEMBER_LOAD_ERROR",
                "Failed to load member",
            ),
            AuthError::NotModerator => (
                StatusCode::FORBIDDEN,
                "NOT_MODERATOR",
                "Only moderators can review public experiences",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
