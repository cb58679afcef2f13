//! Member identity read model
//!
//! Lightweight view of a `members` row carrying what authentication,
//! authorization and member-data calls need.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Authenticated member identity
#[derive(Clone, sqlx::FromRow)]
pub struct AuthIdentity {
    pub id: Uuid,
    /// Open Humans project member id
    pub oh_id: String,
    /// Open Humans OAuth2 access token for member-data calls
    pub access_token: String,
    pub is_moderator: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Debug for AuthIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthIdentity")
            .field("id", &self.id)
            .field("oh_id", &self.oh_id)
            .field("is_moderator", &self.is_moderator)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}
