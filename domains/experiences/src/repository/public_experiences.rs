//! Public experience repository

use autspaces_common::{RepositoryError, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{ContentFilter, ExperienceId, PublicExperience};
use crate::domain::state::ModerationStatus;
use crate::repository::PublicExperienceStore;

/// All columns in the public_experiences table, used for SELECT and RETURNING clauses.
const PUBLIC_EXPERIENCE_COLUMNS: &str = "\
    experience_id, member_id, \
    title_text, experience_text, difference_text, \
    abuse, violence, drug, mentalhealth, negbody, other, \
    moderation_status, created_at, updated_at";

#[derive(Clone)]
pub struct PublicExperienceRepository {
    pool: PgPool,
}

impl PublicExperienceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PublicExperienceStore for PublicExperienceRepository {
    async fn find(&self, id: &ExperienceId) -> Result<Option<PublicExperience>> {
        let query = format!(
            "SELECT {PUBLIC_EXPERIENCE_COLUMNS} FROM public_experiences WHERE experience_id = $1"
        );
        let row = sqlx::query_as::<_, PublicExperience>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::Connection)?;

        Ok(row)
    }

    async fn upsert(&self, row: &PublicExperience) -> Result<PublicExperience> {
        // The WHERE on the update arm leaves a foreign row untouched, which
        // surfaces here as no returned row.
        let query = format!(
            "INSERT INTO public_experiences ({PUBLIC_EXPERIENCE_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             ON CONFLICT (experience_id) DO UPDATE SET \
                title_text = EXCLUDED.title_text, \
                experience_text = EXCLUDED.experience_text, \
                difference_text = EXCLUDED.difference_text, \
                abuse = EXCLUDED.abuse, \
                violence = EXCLUDED.violence, \
                drug = EXCLUDED.drug, \
                mentalhealth = EXCLUDED.mentalhealth, \
                negbody = EXCLUDED.negbody, \
                other = EXCLUDED.other, \
                moderation_status = EXCLUDED.moderation_status, \
                updated_at = NOW() \
             WHERE public_experiences.member_id = EXCLUDED.member_id \
             RETURNING {PUBLIC_EXPERIENCE_COLUMNS}"
        );
        let saved = sqlx::query_as::<_, PublicExperience>(&query)
            .bind(&row.experience_id)
            .bind(row.member_id)
            .bind(&row.title_text)
            .bind(&row.experience_text)
            .bind(&row.difference_text)
            .bind(row.abuse)
            .bind(row.violence)
            .bind(row.drug)
            .bind(row.mentalhealth)
            .bind(row.negbody)
            .bind(row.other)
            .bind(row.moderation_status)
            .bind(row.created_at)
            .bind(row.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::Connection)?;

        saved.ok_or_else(|| RepositoryError::OwnedByAnotherMember.into())
    }

    async fn delete_for_member(&self, id: &ExperienceId, member_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM public_experiences WHERE experience_id = $1 AND member_id = $2")
                .bind(id)
                .bind(member_id)
                .execute(&self.pool)
                .await
                .map_err(RepositoryError::Connection)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_status(
        &self,
        status: ModerationStatus,
        filter: &ContentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PublicExperience>> {
        let query = format!(
            "SELECT {PUBLIC_EXPERIENCE_COLUMNS} FROM public_experiences \
             WHERE moderation_status = $1 \
               AND NOT (abuse AND $2) \
               AND NOT (drug AND $3) \
               AND NOT (negbody AND $4) \
               AND NOT (violence AND $5) \
               AND NOT (mentalhealth AND $6) \
               AND NOT (other AND $7) \
             ORDER BY created_at DESC LIMIT $8 OFFSET $9"
        );
        let rows = sqlx::query_as::<_, PublicExperience>(&query)
            .bind(status)
            .bind(filter.abuse)
            .bind(filter.drug)
            .bind(filter.negbody)
            .bind(filter.violence)
            .bind(filter.mentalhealth)
            .bind(filter.other)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(RepositoryError::Connection)?;

        Ok(rows)
    }

    async fn update_status(
        &self,
        id: &ExperienceId,
        status: ModerationStatus,
    ) -> Result<Option<PublicExperience>> {
        let query = format!(
            "UPDATE public_experiences SET moderation_status = $2, updated_at = NOW() \
             WHERE experience_id = $1 RETURNING {PUBLIC_EXPERIENCE_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, PublicExperience>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(RepositoryError::Connection)?;

        Ok(updated)
    }
}
