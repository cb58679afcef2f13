//! JWT claims types

use serde::{Deserialize, Serialize};

/// Claims carried by a member session token
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (member ID)
    pub sub: String,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}
