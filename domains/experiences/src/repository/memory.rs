//! In-memory public listing store for tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use autspaces_common::{RepositoryError, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::{ContentFilter, ExperienceId, PublicExperience};
use crate::domain::state::ModerationStatus;
use crate::repository::PublicExperienceStore;

/// Public listing store backed by a map, mirroring the Postgres semantics
#[derive(Debug, Clone, Default)]
pub struct InMemoryPublicExperiences {
    rows: Arc<Mutex<HashMap<ExperienceId, PublicExperience>>>,
}

impl InMemoryPublicExperiences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of a row without going through the trait
    pub fn get(&self, id: &ExperienceId) -> Option<PublicExperience> {
        self.rows.lock().unwrap().get(id).cloned()
    }

    /// Put a row in place as-is, bypassing ownership checks
    pub fn insert(&self, row: PublicExperience) {
        self.rows
            .lock()
            .unwrap()
            .insert(row.experience_id.clone(), row);
    }
}

#[async_trait::async_trait]
impl PublicExperienceStore for InMemoryPublicExperiences {
    async fn find(&self, id: &ExperienceId) -> Result<Option<PublicExperience>> {
        Ok(self.get(id))
    }

    async fn upsert(&self, row: &PublicExperience) -> Result<PublicExperience> {
        let mut rows = self.rows.lock().unwrap();
        let saved = match rows.get(&row.experience_id) {
            Some(existing) if existing.member_id != row.member_id => {
                return Err(RepositoryError::OwnedByAnotherMember.into());
            }
            Some(existing) => PublicExperience {
                created_at: existing.created_at,
                updated_at: Utc::now(),
                ..row.clone()
            },
            None => row.clone(),
        };
        rows.insert(saved.experience_id.clone(), saved.clone());
        Ok(saved)
    }

    async fn delete_for_member(&self, id: &ExperienceId, member_id: Uuid) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get(id) {
            Some(existing) if existing.member_id == member_id => {
                rows.remove(id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_by_status(
        &self,
        status: ModerationStatus,
        filter: &ContentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PublicExperience>> {
        let mut matching: Vec<PublicExperience> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|row| row.moderation_status == status && !row.is_hidden_by(filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn update_status(
        &self,
        id: &ExperienceId,
        status: ModerationStatus,
    ) -> Result<Option<PublicExperience>> {
        let mut rows = self.rows.lock().unwrap();
        Ok(rows.get_mut(id).map(|row| {
            row.moderation_status = status;
            row.updated_at = Utc::now();
            row.clone()
        }))
    }
}
