//! Concrete authentication backend
//!
//! Wraps `PgPool` + `AuthConfig` and owns the member lookup query.

use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::types::AuthIdentity;

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    pool: PgPool,
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(pool: PgPool, config: AuthConfig) -> Self {
        Self { pool, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Find member identity by ID
    pub(crate) async fn find_member(&self, id: Uuid) -> Result<Option<AuthIdentity>, AuthError> {
        let member: Option<AuthIdentity> = sqlx::query_as(
            r#"
            SELECT id, oh_id, access_token, is_moderator,
                   created_at, updated_at
            FROM members
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, member_id = %id, "Failed to load member");
            AuthError::MemberLoadError
        })?;

        Ok(member)
    }

    /// Validate a session token and load the member it names
    pub(crate) async fn authenticate_jwt(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = crate::jwt::validate_jwt_token(token, &self.config)?;

        let member_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidMemberId)?;

        let member = self
            .find_member(member_id)
            .await?
            .ok_or(AuthError::MemberNotFound)?;

        Ok(AuthContext::new(member))
    }
}
