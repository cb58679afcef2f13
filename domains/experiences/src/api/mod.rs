//! API layer for the Experiences domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::ExperiencesState;
pub use routes::routes;
