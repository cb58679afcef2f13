//! Repository implementations for the Experiences domain

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod public_experiences;

use autspaces_common::Result;
use uuid::Uuid;

use crate::domain::entities::{ContentFilter, ExperienceId, PublicExperience};
use crate::domain::state::ModerationStatus;

#[cfg(any(test, feature = "test-support"))]
pub use memory::InMemoryPublicExperiences;
pub use public_experiences::PublicExperienceRepository;

/// Storage for the public listing projection
#[async_trait::async_trait]
pub trait PublicExperienceStore: Send + Sync {
    /// Find a listing row by experience id
    async fn find(&self, id: &ExperienceId) -> Result<Option<PublicExperience>>;

    /// Insert or update the row keyed by `experience_id`.
    ///
    /// Content fields and `moderation_status` are overwritten; `created_at`
    /// is kept on update. Fails with a conflict when the id belongs to a
    /// different member.
    async fn upsert(&self, row: &PublicExperience) -> Result<PublicExperience>;

    /// Delete the member's row for `id`, returning whether one existed
    async fn delete_for_member(&self, id: &ExperienceId, member_id: Uuid) -> Result<bool>;

    /// Rows in `status` not hidden by `filter`, newest first
    async fn list_by_status(
        &self,
        status: ModerationStatus,
        filter: &ContentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PublicExperience>>;

    /// Set the moderation status, returning the updated row
    async fn update_status(
        &self,
        id: &ExperienceId,
        status: ModerationStatus,
    ) -> Result<Option<PublicExperience>>;
}
