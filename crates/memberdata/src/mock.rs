//! Mock Member-Data Store Implementation
//!
//! In-memory store for testing and local development:
//! - `MockMemberDataStore`: per-member files with operation recording
//! - `MockBehavior`: makes chosen operations fail on demand
//! - `MockOperation`: the four store operations

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::{FileId, FileUpload, MemberCredentials, MemberDataError, MemberDataStore, RemoteFile};

const DOWNLOAD_URL_PREFIX: &str = "mock://member-data/";

/// Store operations, used for failure injection and recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    Upload,
    ListFiles,
    Delete,
    Download,
}

/// Programmable failure behavior for the mock store
#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    failing: Arc<RwLock<HashSet<MockOperation>>>,
}

impl MockBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `operation` fail with a request error until reset
    pub fn set_failing(&self, operation: MockOperation) {
        self.failing.write().unwrap().insert(operation);
    }

    pub fn is_failing(&self, operation: MockOperation) -> bool {
        self.failing.read().unwrap().contains(&operation)
    }

    /// Reset to default behavior
    pub fn reset(&self) {
        self.failing.write().unwrap().clear();
    }
}

/// A recorded store call for test assertions
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedOperation {
    pub operation: MockOperation,
    pub project_member_id: Option<String>,
    pub file_id: Option<FileId>,
    pub filename: Option<String>,
}

#[derive(Debug, Clone)]
struct StoredFile {
    owner: String,
    file: RemoteFile,
    content: Vec<u8>,
}

/// Mock member-data store with programmable behavior
#[derive(Debug, Clone)]
pub struct MockMemberDataStore {
    files: Arc<Mutex<BTreeMap<FileId, StoredFile>>>,
    next_id: Arc<AtomicI64>,
    behavior: Arc<MockBehavior>,
    history: Arc<Mutex<Vec<RecordedOperation>>>,
}

impl Default for MockMemberDataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMemberDataStore {
    pub fn new() -> Self {
        Self::with_behavior(Arc::new(MockBehavior::new()))
    }

    pub fn with_behavior(behavior: Arc<MockBehavior>) -> Self {
        Self {
            files: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            behavior,
            history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared behavior handle for failure injection
    pub fn behavior(&self) -> &Arc<MockBehavior> {
        &self.behavior
    }

    /// Recorded operations, oldest first
    pub fn recorded_operations(&self) -> Vec<RecordedOperation> {
        self.history.lock().unwrap().clone()
    }

    /// Files currently held for a member, ordered by id
    pub fn files_for(&self, project_member_id: &str) -> Vec<RemoteFile> {
        self.files
            .lock()
            .unwrap()
            .values()
            .filter(|stored| stored.owner == project_member_id)
            .map(|stored| stored.file.clone())
            .collect()
    }

    /// Raw content of a stored file
    pub fn content_of(&self, file_id: FileId) -> Option<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(&file_id)
            .map(|stored| stored.content.clone())
    }

    /// Total number of files across all members
    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }

    fn record(&self, operation: RecordedOperation) {
        self.history.lock().unwrap().push(operation);
    }

    fn check(&self, operation: MockOperation) -> Result<(), MemberDataError> {
        if self.behavior.is_failing(operation) {
            return Err(MemberDataError::Request(format!(
                "Mock {:?} configured to fail",
                operation
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl MemberDataStore for MockMemberDataStore {
    async fn upload(
        &self,
        member: &MemberCredentials,
        upload: FileUpload,
    ) -> Result<FileId, MemberDataError> {
        self.record(RecordedOperation {
            operation: MockOperation::Upload,
            project_member_id: Some(member.project_member_id.clone()),
            file_id: None,
            filename: Some(upload.filename.clone()),
        });
        self.check(MockOperation::Upload)?;

        let id = FileId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let stored = StoredFile {
            owner: member.project_member_id.clone(),
            file: RemoteFile {
                id,
                basename: upload.filename,
                download_url: format!("{}{}", DOWNLOAD_URL_PREFIX, id),
                metadata: upload.metadata,
            },
            content: upload.content,
        };
        self.files.lock().unwrap().insert(id, stored);

        tracing::debug!(file_id = %id, "Mock member data upload stored");
        Ok(id)
    }

    async fn list_files(
        &self,
        member: &MemberCredentials,
    ) -> Result<Vec<RemoteFile>, MemberDataError> {
        self.record(RecordedOperation {
            operation: MockOperation::ListFiles,
            project_member_id: Some(member.project_member_id.clone()),
            file_id: None,
            filename: None,
        });
        self.check(MockOperation::ListFiles)?;

        Ok(self.files_for(&member.project_member_id))
    }

    async fn delete_single_file(
        &self,
        member: &MemberCredentials,
        file_id: FileId,
    ) -> Result<(), MemberDataError> {
        self.record(RecordedOperation {
            operation: MockOperation::Delete,
            project_member_id: Some(member.project_member_id.clone()),
            file_id: Some(file_id),
            filename: None,
        });
        self.check(MockOperation::Delete)?;

        let mut files = self.files.lock().unwrap();
        match files.get(&file_id) {
            Some(stored) if stored.owner == member.project_member_id => {
                files.remove(&file_id);
                Ok(())
            }
            _ => Err(MemberDataError::NotFound(format!("file {}", file_id))),
        }
    }

    async fn download(&self, download_url: &str) -> Result<Vec<u8>, MemberDataError> {
        let file_id = download_url
            .strip_prefix(DOWNLOAD_URL_PREFIX)
            .and_then(|raw| raw.parse::<i64>().ok())
            .map(FileId)
            .ok_or_else(|| {
                MemberDataError::Request(format!("Not a mock download URL: {}", download_url))
            })?;

        self.record(RecordedOperation {
            operation: MockOperation::Download,
            project_member_id: None,
            file_id: Some(file_id),
            filename: None,
        });
        self.check(MockOperation::Download)?;

        self.content_of(file_id)
            .ok_or_else(|| MemberDataError::NotFound(format!("file {}", file_id)))
    }
}
