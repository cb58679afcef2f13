//! AutSPACEs member-data store
//!
//! Per-member file storage where experiences live as JSON files with a
//! metadata sidecar:
//! - Open Humans direct-sharing API client for production
//! - In-memory mock store for testing and local development
//!
//! The store only offers whole-object operations (upload, list, delete,
//! download). There is no rename or in-place metadata patch.

pub mod mock;
pub mod openhumans;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemberDataError {
    #[error("Member data configuration error: {0}")]
    Configuration(String),

    #[error("Member data request error: {0}")]
    Request(String),

    #[error("Member data response error: {0}")]
    Response(String),

    #[error("Member data file not found: {0}")]
    NotFound(String),
}

impl From<MemberDataError> for autspaces_common::Error {
    fn from(err: MemberDataError) -> Self {
        match err {
            MemberDataError::NotFound(msg) => autspaces_common::Error::NotFound(msg),
            MemberDataError::Configuration(msg) => autspaces_common::Error::Internal(msg),
            e @ (MemberDataError::Request(_) | MemberDataError::Response(_)) => {
                autspaces_common::Error::Upstream(e.to_string())
            }
        }
    }
}

/// Store-assigned file identifier, distinct from the experience `uuid`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub i64);

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Credentials identifying whose files an operation touches
#[derive(Clone, PartialEq, Eq)]
pub struct MemberCredentials {
    pub project_member_id: String,
    pub access_token: String,
}

impl std::fmt::Debug for MemberCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberCredentials")
            .field("project_member_id", &self.project_member_id)
            .finish_non_exhaustive()
    }
}

/// A file as listed by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub id: FileId,
    pub basename: String,
    pub download_url: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// A file to be stored
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub content: Vec<u8>,
    pub metadata: serde_json::Value,
}

impl FileUpload {
    /// Build an upload whose content is `body` serialized as JSON
    pub fn json<T: Serialize, M: Serialize>(
        filename: impl Into<String>,
        body: &T,
        metadata: &M,
    ) -> Result<Self, MemberDataError> {
        let content = serde_json::to_vec(body)
            .map_err(|e| MemberDataError::Configuration(format!("Unserializable body: {}", e)))?;
        let metadata = serde_json::to_value(metadata).map_err(|e| {
            MemberDataError::Configuration(format!("Unserializable metadata: {}", e))
        })?;

        Ok(Self {
            filename: filename.into(),
            content,
            metadata,
        })
    }
}

/// Member-data store configuration
#[derive(Debug, Clone)]
pub struct MemberDataConfig {
    /// Store provider (openhumans, mock)
    pub provider: String,
    /// Base URL of the Open Humans deployment
    pub base_url: String,
}

/// Member-data store trait for different backends
#[async_trait::async_trait]
pub trait MemberDataStore: Send + Sync {
    /// Store a file with its metadata, returning the store-assigned id
    async fn upload(
        &self,
        member: &MemberCredentials,
        upload: FileUpload,
    ) -> Result<FileId, MemberDataError>;

    /// List every file the member has in this project
    async fn list_files(&self, member: &MemberCredentials)
        -> Result<Vec<RemoteFile>, MemberDataError>;

    /// Remove one file by its store-assigned id
    async fn delete_single_file(
        &self,
        member: &MemberCredentials,
        file_id: FileId,
    ) -> Result<(), MemberDataError>;

    /// Fetch raw file content from a listed `download_url`
    async fn download(&self, download_url: &str) -> Result<Vec<u8>, MemberDataError>;
}

/// Factory for creating MemberDataStore implementations
pub struct MemberDataStoreFactory;

impl MemberDataStoreFactory {
    pub fn create(config: MemberDataConfig) -> Result<Box<dyn MemberDataStore>, MemberDataError> {
        match config.provider.as_str() {
            "openhumans" => {
                tracing::info!(base_url = %config.base_url, "Creating Open Humans member data store");
                Ok(Box::new(openhumans::OpenHumansStore::new(config.base_url)))
            }
            "mock" => {
                tracing::info!("Creating mock member data store");
                Ok(Box::new(mock::MockMemberDataStore::new()))
            }
            provider => Err(MemberDataError::Configuration(format!(
                "Unknown member data provider: {}. Supported providers: openhumans, mock",
                provider
            ))),
        }
    }
}
