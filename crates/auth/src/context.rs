//! Authorization context for authenticated members

use crate::types::AuthIdentity;

/// Represents an authenticated member context
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub member: AuthIdentity,
}

impl AuthContext {
    pub fn new(member: AuthIdentity) -> Self {
        Self { member }
    }

    /// Check if the member may act on the moderation queue
    pub fn is_moderator(&self) -> bool {
        self.member.is_moderator
    }
}
