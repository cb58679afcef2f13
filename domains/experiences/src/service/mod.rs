//! Experience operations
//!
//! Every write goes to the member-data store first and is then reconciled
//! into the public listing keyed by the experience id.

pub mod moderation;
pub mod reconcile;
pub mod sharing;

pub use reconcile::{reconcile_public_listing, ReconcileOutcome};
pub use sharing::{ExperienceService, SharedExperience};
