//! Public listing reconciliation

use autspaces_common::Result;

use crate::domain::entities::{ExperienceData, ExperienceId, Member, PublicExperience};
use crate::repository::PublicExperienceStore;

/// Result of bringing the listing in line with one experience
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// The experience is viewable and its row was written
    Published(PublicExperience),
    /// The experience is not viewable; `removed` tells whether a row existed
    Withdrawn { removed: bool },
}

impl ReconcileOutcome {
    pub fn row(&self) -> Option<&PublicExperience> {
        match self {
            Self::Published(row) => Some(row),
            Self::Withdrawn { .. } => None,
        }
    }
}

/// Upsert or remove the listing row for an experience after a store write.
///
/// A viewable experience gets a fresh `not reviewed` row; anything else
/// loses its row. There is no compensation if the store write that
/// preceded this call is later found to have failed.
pub async fn reconcile_public_listing(
    listing: &dyn PublicExperienceStore,
    data: &ExperienceData,
    id: &ExperienceId,
    member: &Member,
) -> Result<ReconcileOutcome> {
    if data.viewable {
        let row = PublicExperience::from_experience(id.clone(), member.id, data);
        let saved = listing.upsert(&row).await?;
        tracing::info!(
            experience_id = %id,
            member_id = %member.id,
            "Public listing row published"
        );
        Ok(ReconcileOutcome::Published(saved))
    } else {
        let removed = listing.delete_for_member(id, member.id).await?;
        tracing::info!(
            experience_id = %id,
            member_id = %member.id,
            removed,
            "Public listing row withdrawn"
        );
        Ok(ReconcileOutcome::Withdrawn { removed })
    }
}
