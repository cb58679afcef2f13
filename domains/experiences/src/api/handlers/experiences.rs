//! Member experience API handlers

use autspaces_auth::AuthMember;
use autspaces_common::{Result, ValidatedJson};
use autspaces_memberdata::FileId;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::middleware::ExperiencesState;
use crate::domain::entities::{ExperienceData, ExperienceId, Member, MemberExperience};
use crate::service::SharedExperience;

/// Experience response DTO
#[derive(Debug, Serialize)]
pub struct ExperienceResponse {
    pub experience_id: ExperienceId,
    pub file_id: FileId,
    pub basename: String,
    pub title: String,
    pub tags: Vec<String>,
    pub data: ExperienceData,
    pub timestamp: DateTime<Utc>,
}

impl From<MemberExperience> for ExperienceResponse {
    fn from(e: MemberExperience) -> Self {
        Self {
            experience_id: e.metadata.uuid,
            file_id: e.file_id,
            basename: e.basename,
            title: e.metadata.description,
            tags: e.metadata.tags,
            data: e.metadata.data,
            timestamp: e.metadata.timestamp,
        }
    }
}

/// List the authenticated member's experiences
pub async fn list_experiences(
    AuthMember(ctx): AuthMember,
    State(state): State<ExperiencesState>,
) -> Result<Json<Vec<ExperienceResponse>>> {
    let member = Member::from(&ctx);
    let experiences = state.service.list(&member).await?;

    let responses: Vec<ExperienceResponse> = experiences.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Get one of the member's experiences
pub async fn get_experience(
    AuthMember(ctx): AuthMember,
    State(state): State<ExperiencesState>,
    Path(id): Path<String>,
) -> Result<Json<ExperienceResponse>> {
    let member = Member::from(&ctx);
    let experience = state.service.get(&member, &id.into()).await?;
    Ok(Json(experience.into()))
}

/// Share a new experience
pub async fn share_experience(
    AuthMember(ctx): AuthMember,
    State(state): State<ExperiencesState>,
    ValidatedJson(data): ValidatedJson<ExperienceData>,
) -> Result<(StatusCode, Json<SharedExperience>)> {
    let member = Member::from(&ctx);
    let shared = state.service.share(&member, data).await?;
    Ok((StatusCode::CREATED, Json(shared)))
}

/// Replace an experience's payload
pub async fn edit_experience(
    AuthMember(ctx): AuthMember,
    State(state): State<ExperiencesState>,
    Path(id): Path<String>,
    ValidatedJson(data): ValidatedJson<ExperienceData>,
) -> Result<Json<SharedExperience>> {
    let member = Member::from(&ctx);
    let shared = state.service.edit(&member, &id.into(), data).await?;
    Ok(Json(shared))
}

/// Delete an experience
pub async fn delete_experience(
    AuthMember(ctx): AuthMember,
    State(state): State<ExperiencesState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let member = Member::from(&ctx);
    state.service.delete(&member, &id.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Publish an experience to the public listing
pub async fn make_viewable(
    AuthMember(ctx): AuthMember,
    State(state): State<ExperiencesState>,
    Path(id): Path<String>,
) -> Result<Json<SharedExperience>> {
    let member = Member::from(&ctx);
    Ok(Json(state.service.make_viewable(&member, &id.into()).await?))
}

/// Withdraw an experience from the public listing
pub async fn make_non_viewable(
    AuthMember(ctx): AuthMember,
    State(state): State<ExperiencesState>,
    Path(id): Path<String>,
) -> Result<Json<SharedExperience>> {
    let member = Member::from(&ctx);
    Ok(Json(
        state
            .service
            .make_non_viewable(&member, &id.into())
            .await?,
    ))
}

/// Consent to research use of an experience
pub async fn make_research(
    AuthMember(ctx): AuthMember,
    State(state): State<ExperiencesState>,
    Path(id): Path<String>,
) -> Result<Json<SharedExperience>> {
    let member = Member::from(&ctx);
    Ok(Json(state.service.make_research(&member, &id.into()).await?))
}

/// Withdraw research consent for an experience
pub async fn make_non_research(
    AuthMember(ctx): AuthMember,
    State(state): State<ExperiencesState>,
    Path(id): Path<String>,
) -> Result<Json<SharedExperience>> {
    let member = Member::from(&ctx);
    Ok(Json(
        state
            .service
            .make_non_research(&member, &id.into())
            .await?,
    ))
}
