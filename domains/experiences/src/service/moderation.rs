//! Public listing reads and moderator actions

use autspaces_common::{Error, Pagination, Result};

use crate::domain::entities::{ContentFilter, ExperienceId, PublicExperience};
use crate::domain::state::{ModerationEvent, ModerationStateMachine, ModerationStatus};
use crate::service::sharing::ExperienceService;

impl ExperienceService {
    /// Approve a listing row. Only the moderation status changes.
    pub async fn approve_experience(&self, id: &ExperienceId) -> Result<PublicExperience> {
        let row = self
            .listing()
            .find(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Public experience {} not found", id)))?;

        let next = ModerationStateMachine::transition(row.moderation_status, ModerationEvent::Approve)?;
        let approved = self
            .listing()
            .update_status(id, next)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Public experience {} not found", id)))?;

        tracing::info!(
            experience_id = %id,
            from = %row.moderation_status,
            to = %approved.moderation_status,
            "Public experience approved"
        );
        Ok(approved)
    }

    /// Rows awaiting a moderator, newest first
    pub async fn moderation_queue(&self, page: Pagination) -> Result<Vec<PublicExperience>> {
        self.listing()
            .list_by_status(
                ModerationStatus::NotReviewed,
                &ContentFilter::default(),
                page.limit(),
                page.offset(),
            )
            .await
    }

    /// Approved rows minus those carrying a warning the viewer excluded
    pub async fn public_listing(
        &self,
        filter: &ContentFilter,
        page: Pagination,
    ) -> Result<Vec<PublicExperience>> {
        self.listing()
            .list_by_status(
                ModerationStatus::Approved,
                filter,
                page.limit(),
                page.offset(),
            )
            .await
    }
}
