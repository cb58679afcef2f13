//! Domain entities for the Experiences domain
//!
//! An experience lives in the member-data store as a JSON file
//! ([`StoredExperience`]) with a metadata sidecar ([`ExperienceMetadata`]).
//! When viewable, a redacted copy is projected into the local
//! `public_experiences` table ([`PublicExperience`]).

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use autspaces_auth::AuthContext;
use autspaces_memberdata::{FileId, MemberCredentials, RemoteFile};

use crate::domain::state::ModerationStatus;
use crate::domain::tags::{make_tags, ContentWarning};

/// Shared identifier of an experience across the store and the listing
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ExperienceId(String);

impl ExperienceId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ExperienceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ExperienceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for ExperienceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Experience payload as submitted by a member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ExperienceData {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub experience: String,
    #[serde(default)]
    pub wish_different: String,
    #[serde(default)]
    pub viewable: bool,
    #[serde(default)]
    pub research: bool,
    #[serde(default)]
    pub drug: bool,
    #[serde(default)]
    pub abuse: bool,
    #[serde(default)]
    pub negbody: bool,
    #[serde(default)]
    pub violence: bool,
    #[serde(default)]
    pub mentalhealth: bool,
    /// Free-text warning, empty when unused
    #[serde(default)]
    pub other: String,
}

impl ExperienceData {
    /// Flagged content warnings in tag order
    pub fn warnings(&self) -> Vec<ContentWarning> {
        ContentWarning::ALL
            .into_iter()
            .filter(|w| self.has_warning(*w))
            .collect()
    }

    pub fn has_warning(&self, warning: ContentWarning) -> bool {
        match warning {
            ContentWarning::Drug => self.drug,
            ContentWarning::Abuse => self.abuse,
            ContentWarning::NegativeBody => self.negbody,
            ContentWarning::Violence => self.violence,
            ContentWarning::MentalHealth => self.mentalhealth,
        }
    }

    pub fn has_other_warning(&self) -> bool {
        !self.other.is_empty()
    }
}

/// File body stored in the member-data store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredExperience {
    pub data: ExperienceData,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Metadata sidecar stored with each experience file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceMetadata {
    pub uuid: ExperienceId,
    pub description: String,
    pub tags: Vec<String>,
    pub data: ExperienceData,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Read an RFC 3339 timestamp, or the naive `YYYY-MM-DD HH:MM:SS.ffffff`
/// form found in older records, taken as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {:?}: {}", raw, e)))
}

impl ExperienceMetadata {
    /// Metadata for a freshly written payload, tags derived from its flags
    pub fn new(uuid: ExperienceId, data: ExperienceData, timestamp: DateTime<Utc>) -> Self {
        Self {
            uuid,
            description: data.title.clone(),
            tags: make_tags(&data),
            data,
            timestamp,
        }
    }

    pub fn body(&self) -> StoredExperience {
        StoredExperience {
            data: self.data.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// An experience as found in a member's file list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberExperience {
    pub file_id: FileId,
    pub basename: String,
    pub download_url: String,
    pub metadata: ExperienceMetadata,
}

impl MemberExperience {
    /// Interpret a listed file as an experience.
    ///
    /// Returns `None` for files whose metadata is not an experience envelope.
    pub fn from_remote(file: RemoteFile) -> Option<Self> {
        let metadata: ExperienceMetadata = match serde_json::from_value(file.metadata) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(file_id = %file.id, error = %e, "Skipping file without experience metadata");
                return None;
            }
        };

        Some(Self {
            file_id: file.id,
            basename: file.basename,
            download_url: file.download_url,
            metadata,
        })
    }

    pub fn experience_id(&self) -> &ExperienceId {
        &self.metadata.uuid
    }
}

/// The member on whose behalf an operation runs
#[derive(Debug, Clone)]
pub struct Member {
    pub id: Uuid,
    pub credentials: MemberCredentials,
}

impl From<&AuthContext> for Member {
    fn from(ctx: &AuthContext) -> Self {
        Self {
            id: ctx.member.id,
            credentials: MemberCredentials {
                project_member_id: ctx.member.oh_id.clone(),
                access_token: ctx.member.access_token.clone(),
            },
        }
    }
}

/// Public listing row: redacted projection of a viewable experience
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PublicExperience {
    pub experience_id: ExperienceId,
    pub member_id: Uuid,
    pub title_text: String,
    pub experience_text: String,
    pub difference_text: String,
    pub abuse: bool,
    pub violence: bool,
    pub drug: bool,
    pub mentalhealth: bool,
    pub negbody: bool,
    /// True when the member described an other warning; the text itself is not published
    pub other: bool,
    pub moderation_status: ModerationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PublicExperience {
    /// Project an experience payload into a listing row awaiting review
    pub fn from_experience(id: ExperienceId, member_id: Uuid, data: &ExperienceData) -> Self {
        let now = Utc::now();
        Self {
            experience_id: id,
            member_id,
            title_text: data.title.clone(),
            experience_text: data.experience.clone(),
            difference_text: data.wish_different.clone(),
            abuse: data.abuse,
            violence: data.violence,
            drug: data.drug,
            mentalhealth: data.mentalhealth,
            negbody: data.negbody,
            other: data.has_other_warning(),
            moderation_status: ModerationStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// True when the row carries content the viewer asked to hide
    pub fn is_hidden_by(&self, filter: &ContentFilter) -> bool {
        (filter.abuse && self.abuse)
            || (filter.drug && self.drug)
            || (filter.negbody && self.negbody)
            || (filter.violence && self.violence)
            || (filter.mentalhealth && self.mentalhealth)
            || (filter.other && self.other)
    }
}

/// Content warnings a listing viewer chose to hide
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ContentFilter {
    #[serde(default)]
    pub abuse: bool,
    #[serde(default)]
    pub drug: bool,
    #[serde(default)]
    pub negbody: bool,
    #[serde(default)]
    pub violence: bool,
    #[serde(default)]
    pub mentalhealth: bool,
    #[serde(default)]
    pub other: bool,
}

/// Derive the upload filename for an experience file.
///
/// First two title words, the identifier prefix and a UTC timestamp, so
/// replacements never reuse a name.
pub fn upload_filename(title: &str, id: &ExperienceId, at: DateTime<Utc>) -> String {
    let words: Vec<String> = title
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-')
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .take(2)
        .collect();

    let stem = if words.is_empty() {
        "experience".to_string()
    } else {
        words.join("_")
    };
    let id_prefix: String = id.as_str().chars().filter(|c| *c != '-').take(8).collect();

    format!("{}_{}_{}.json", stem, id_prefix, at.format("%Y%m%dT%H%M%S"))
}
