//! Member-facing experience operations
//!
//! The member-data store only offers whole-object operations, so every
//! change uploads a replacement file under a fresh name and then removes the
//! older files carrying the same experience id.

use std::sync::Arc;

use autspaces_common::{Error, Result};
use autspaces_memberdata::{FileId, FileUpload, MemberDataError, MemberDataStore};
use chrono::{DateTime, Utc};
use serde::Serialize;
use validator::Validate;

use crate::domain::entities::{
    upload_filename, ExperienceData, ExperienceId, ExperienceMetadata, Member, MemberExperience,
    StoredExperience,
};
use crate::domain::state::ModerationStatus;
use crate::domain::tags::{ResearchConsent, TagSet, Visibility};
use crate::repository::PublicExperienceStore;
use crate::service::reconcile::{reconcile_public_listing, ReconcileOutcome};

/// An experience after a write, with the state of its listing row
#[derive(Debug, Clone, Serialize)]
pub struct SharedExperience {
    pub experience_id: ExperienceId,
    pub file_id: FileId,
    pub basename: String,
    pub tags: Vec<String>,
    pub data: ExperienceData,
    pub timestamp: DateTime<Utc>,
    /// Moderation status of the listing row, `None` when not listed
    pub listing: Option<ModerationStatus>,
}

/// Experience operations over the member-data store and the public listing
#[derive(Clone)]
pub struct ExperienceService {
    files: Arc<dyn MemberDataStore>,
    listing: Arc<dyn PublicExperienceStore>,
}

impl ExperienceService {
    pub fn new(files: Arc<dyn MemberDataStore>, listing: Arc<dyn PublicExperienceStore>) -> Self {
        Self { files, listing }
    }

    #[mutants::skip] // Accessor; exercised by every listing operation
    pub fn listing(&self) -> &dyn PublicExperienceStore {
        self.listing.as_ref()
    }

    /// The member's experiences, newest first, one entry per experience id
    pub async fn list(&self, member: &Member) -> Result<Vec<MemberExperience>> {
        let mut records = self.experience_records(member).await?;

        // Newest file wins when an interrupted replacement left duplicates.
        records.sort_by(|a, b| b.file_id.cmp(&a.file_id));
        let mut seen = std::collections::HashSet::new();
        records.retain(|record| seen.insert(record.experience_id().clone()));
        records.sort_by(|a, b| b.metadata.timestamp.cmp(&a.metadata.timestamp));

        Ok(records)
    }

    /// One of the member's experiences by id
    pub async fn get(&self, member: &Member, id: &ExperienceId) -> Result<MemberExperience> {
        self.records_for(member, id)
            .await?
            .pop()
            .ok_or_else(|| not_found(id))
    }

    /// Store a new experience and publish it when viewable
    pub async fn share(&self, member: &Member, data: ExperienceData) -> Result<SharedExperience> {
        validate(&data)?;

        let id = ExperienceId::generate();
        let metadata = ExperienceMetadata::new(id.clone(), data, Utc::now());
        let (file_id, basename) = self.upload(member, &metadata).await?;
        let outcome =
            reconcile_public_listing(self.listing(), &metadata.data, &id, member).await?;

        tracing::info!(
            experience_id = %id,
            member_id = %member.id,
            file_id = %file_id,
            "Experience shared"
        );
        Ok(shared(metadata, file_id, basename, &outcome))
    }

    /// Replace an experience's payload
    pub async fn edit(
        &self,
        member: &Member,
        id: &ExperienceId,
        data: ExperienceData,
    ) -> Result<SharedExperience> {
        validate(&data)?;

        let previous = self.records_for(member, id).await?;
        if previous.is_empty() {
            return Err(not_found(id));
        }

        let metadata = ExperienceMetadata::new(id.clone(), data, Utc::now());
        let (file_id, basename) = self.upload(member, &metadata).await?;
        self.retire(member, &previous).await?;
        let outcome = reconcile_public_listing(self.listing(), &metadata.data, id, member).await?;

        tracing::info!(
            experience_id = %id,
            member_id = %member.id,
            file_id = %file_id,
            "Experience edited"
        );
        Ok(shared(metadata, file_id, basename, &outcome))
    }

    /// Remove an experience from the store and the public listing
    pub async fn delete(&self, member: &Member, id: &ExperienceId) -> Result<()> {
        let records = self.records_for(member, id).await?;
        self.retire(member, &records).await?;
        let removed = self.listing.delete_for_member(id, member.id).await?;

        if records.is_empty() && !removed {
            return Err(not_found(id));
        }

        tracing::info!(
            experience_id = %id,
            member_id = %member.id,
            files_removed = records.len(),
            listing_removed = removed,
            "Experience deleted"
        );
        Ok(())
    }

    pub async fn make_viewable(
        &self,
        member: &Member,
        id: &ExperienceId,
    ) -> Result<SharedExperience> {
        self.set_visibility(member, id, Visibility::Public).await
    }

    pub async fn make_non_viewable(
        &self,
        member: &Member,
        id: &ExperienceId,
    ) -> Result<SharedExperience> {
        self.set_visibility(member, id, Visibility::NotPublic).await
    }

    pub async fn make_research(
        &self,
        member: &Member,
        id: &ExperienceId,
    ) -> Result<SharedExperience> {
        self.set_research(member, id, ResearchConsent::Research)
            .await
    }

    pub async fn make_non_research(
        &self,
        member: &Member,
        id: &ExperienceId,
    ) -> Result<SharedExperience> {
        self.set_research(member, id, ResearchConsent::NonResearch)
            .await
    }

    async fn set_visibility(
        &self,
        member: &Member,
        id: &ExperienceId,
        visibility: Visibility,
    ) -> Result<SharedExperience> {
        let (metadata, file_id, basename) = self
            .replace(member, id, |data, tags| {
                data.viewable = visibility.is_public();
                tags.with_visibility(visibility)
            })
            .await?;
        let outcome = reconcile_public_listing(self.listing(), &metadata.data, id, member).await?;

        tracing::info!(
            experience_id = %id,
            member_id = %member.id,
            visibility = visibility.tag(),
            "Experience visibility changed"
        );
        Ok(shared(metadata, file_id, basename, &outcome))
    }

    async fn set_research(
        &self,
        member: &Member,
        id: &ExperienceId,
        research: ResearchConsent,
    ) -> Result<SharedExperience> {
        let (metadata, file_id, basename) = self
            .replace(member, id, |data, tags| {
                data.research = research.is_consented();
                tags.with_research(research)
            })
            .await?;
        let listing = self
            .listing
            .find(id)
            .await?
            .filter(|row| row.member_id == member.id)
            .map(|row| row.moderation_status);

        tracing::info!(
            experience_id = %id,
            member_id = %member.id,
            research = research.tag(),
            "Experience research consent changed"
        );
        Ok(SharedExperience {
            experience_id: metadata.uuid,
            file_id,
            basename,
            tags: metadata.tags,
            data: metadata.data,
            timestamp: metadata.timestamp,
            listing,
        })
    }

    /// Rewrite the newest record for `id` with `change` applied to its
    /// downloaded payload and its stored tags, keeping the stored timestamp.
    async fn replace<F>(
        &self,
        member: &Member,
        id: &ExperienceId,
        change: F,
    ) -> Result<(ExperienceMetadata, FileId, String)>
    where
        F: FnOnce(&mut ExperienceData, TagSet) -> TagSet,
    {
        let previous = self.records_for(member, id).await?;
        let current = previous.last().ok_or_else(|| not_found(id))?;

        let content = self.files.download(&current.download_url).await?;
        let stored: StoredExperience = serde_json::from_slice(&content)?;

        let mut data = stored.data;
        let tags = change(&mut data, TagSet::parse(&current.metadata.tags)).to_tags();
        let metadata = ExperienceMetadata {
            uuid: id.clone(),
            description: data.title.clone(),
            tags,
            data,
            timestamp: stored.timestamp,
        };

        let (file_id, basename) = self.upload(member, &metadata).await?;
        self.retire(member, &previous).await?;
        Ok((metadata, file_id, basename))
    }

    async fn upload(
        &self,
        member: &Member,
        metadata: &ExperienceMetadata,
    ) -> Result<(FileId, String)> {
        let filename = upload_filename(&metadata.data.title, &metadata.uuid, Utc::now());
        let upload = FileUpload::json(filename.clone(), &metadata.body(), metadata)?;
        let file_id = self.files.upload(&member.credentials, upload).await?;

        tracing::debug!(
            experience_id = %metadata.uuid,
            file_id = %file_id,
            filename = %filename,
            "Experience file uploaded"
        );
        Ok((file_id, filename))
    }

    /// Delete superseded files; ones already gone are skipped
    async fn retire(&self, member: &Member, records: &[MemberExperience]) -> Result<()> {
        for record in records {
            match self
                .files
                .delete_single_file(&member.credentials, record.file_id)
                .await
            {
                Ok(()) => {
                    tracing::debug!(
                        experience_id = %record.experience_id(),
                        file_id = %record.file_id,
                        "Experience file removed"
                    );
                }
                Err(MemberDataError::NotFound(_)) => {
                    tracing::warn!(
                        experience_id = %record.experience_id(),
                        file_id = %record.file_id,
                        "Experience file already gone"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    async fn experience_records(&self, member: &Member) -> Result<Vec<MemberExperience>> {
        let files = self.files.list_files(&member.credentials).await?;
        Ok(files
            .into_iter()
            .filter_map(MemberExperience::from_remote)
            .collect())
    }

    /// Every record carrying `id`, oldest file first
    async fn records_for(
        &self,
        member: &Member,
        id: &ExperienceId,
    ) -> Result<Vec<MemberExperience>> {
        let mut records: Vec<MemberExperience> = self
            .experience_records(member)
            .await?
            .into_iter()
            .filter(|record| record.experience_id() == id)
            .collect();
        records.sort_by_key(|record| record.file_id);
        Ok(records)
    }
}

fn validate(data: &ExperienceData) -> Result<()> {
    data.validate()
        .map_err(|e| Error::Validation(format!("Validation failed: {}", e)))
}

fn not_found(id: &ExperienceId) -> Error {
    Error::NotFound(format!("Experience {} not found", id))
}

fn shared(
    metadata: ExperienceMetadata,
    file_id: FileId,
    basename: String,
    outcome: &ReconcileOutcome,
) -> SharedExperience {
    SharedExperience {
        experience_id: metadata.uuid,
        file_id,
        basename,
        tags: metadata.tags,
        data: metadata.data,
        timestamp: metadata.timestamp,
        listing: outcome.row().map(|row| row.moderation_status),
    }
}
