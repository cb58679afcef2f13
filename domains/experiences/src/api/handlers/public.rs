//! Public listing API handlers

use autspaces_common::{Pagination, Result};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::middleware::ExperiencesState;
use crate::domain::entities::{ContentFilter, ExperienceId, PublicExperience};

/// Public experience DTO; the owning member is not disclosed
#[derive(Debug, Serialize)]
pub struct PublicExperienceResponse {
    pub experience_id: ExperienceId,
    pub title_text: String,
    pub experience_text: String,
    pub difference_text: String,
    pub abuse: bool,
    pub violence: bool,
    pub drug: bool,
    pub mentalhealth: bool,
    pub negbody: bool,
    pub other: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PublicExperience> for PublicExperienceResponse {
    fn from(p: PublicExperience) -> Self {
        Self {
            experience_id: p.experience_id,
            title_text: p.title_text,
            experience_text: p.experience_text,
            difference_text: p.difference_text,
            abuse: p.abuse,
            violence: p.violence,
            drug: p.drug,
            mentalhealth: p.mentalhealth,
            negbody: p.negbody,
            other: p.other,
            created_at: p.created_at,
        }
    }
}

/// List approved experiences, hiding any the viewer filtered out
pub async fn list_public_experiences(
    State(state): State<ExperiencesState>,
    Query(filter): Query<ContentFilter>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<PublicExperienceResponse>>> {
    let rows = state.service.public_listing(&filter, page).await?;

    let responses: Vec<PublicExperienceResponse> = rows.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}
