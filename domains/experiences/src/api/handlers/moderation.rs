//! Moderation API handlers

use autspaces_auth::ModeratorMember;
use autspaces_common::{Pagination, Result};
use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::api::middleware::ExperiencesState;
use crate::domain::entities::PublicExperience;

/// List rows awaiting review
pub async fn list_moderation_queue(
    ModeratorMember(_ctx): ModeratorMember,
    State(state): State<ExperiencesState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<PublicExperience>>> {
    let rows = state.service.moderation_queue(page).await?;
    Ok(Json(rows))
}

/// Approve a row for the public listing
pub async fn approve_experience(
    ModeratorMember(ctx): ModeratorMember,
    State(state): State<ExperiencesState>,
    Path(id): Path<String>,
) -> Result<Json<PublicExperience>> {
    let approved = state.service.approve_experience(&id.into()).await?;

    tracing::info!(
        moderator_id = %ctx.member.id,
        experience_id = %approved.experience_id,
        "Moderator approved experience"
    );
    Ok(Json(approved))
}
