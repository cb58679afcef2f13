//! Experiences domain: member narratives stored in the member-data store,
//! their public listing projection, and moderation

pub mod api;
pub mod domain;
pub mod repository;
pub mod service;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    upload_filename, ContentFilter, ExperienceData, ExperienceId, ExperienceMetadata, Member,
    MemberExperience, PublicExperience, StoredExperience,
};
pub use domain::state::{ModerationEvent, ModerationStateMachine, ModerationStatus};
pub use domain::tags::{make_tags, ContentWarning, ResearchConsent, TagSet, Visibility};

// Re-export repository types
pub use repository::{PublicExperienceRepository, PublicExperienceStore};

// Re-export service types
pub use service::{reconcile_public_listing, ExperienceService, ReconcileOutcome, SharedExperience};

// Re-export API types
pub use api::routes;
pub use api::ExperiencesState;
