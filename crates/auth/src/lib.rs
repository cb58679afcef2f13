//! Authentication middleware for the AutSPACEs API
//!
//! Provides JWT validation, member lookup, and axum extractors that work
//! with any domain state implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;
mod types;

pub use backend::AuthBackend;
pub use claims::SessionClaims;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::{AuthMember, ModeratorMember};
pub use types::AuthIdentity;
