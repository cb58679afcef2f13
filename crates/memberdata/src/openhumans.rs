//! Open Humans direct-sharing API implementation
//!
//! Uses the member-scoped endpoints with the member's OAuth2 access token:
//! - `GET  exchange-member/` to list files
//! - `POST files/upload/direct/`, `PUT <signed url>`, `POST files/upload/complete/` to upload
//! - `POST files/delete/` to delete

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::{FileId, FileUpload, MemberCredentials, MemberDataError, MemberDataStore, RemoteFile};

const API_PREFIX: &str = "/api/direct-sharing/project";

/// Response of the `exchange-member` endpoint; only the file list is used
#[derive(Debug, Deserialize)]
struct ExchangeMemberResponse {
    #[serde(default)]
    data: Vec<RemoteFile>,
}

/// Response of `files/upload/direct/`
#[derive(Debug, Deserialize)]
struct DirectUploadResponse {
    id: FileId,
    url: String,
}

#[derive(Debug, Serialize)]
struct DirectUploadForm<'a> {
    project_member_id: &'a str,
    filename: &'a str,
    metadata: String,
}

#[derive(Debug, Serialize)]
struct FileForm<'a> {
    project_member_id: &'a str,
    file_id: i64,
}

/// Open Humans member-data store
pub struct OpenHumansStore {
    client: Client,
    base_url: String,
}

impl OpenHumansStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}/{}/", self.base_url, API_PREFIX, path.trim_matches('/'))
    }

    /// Turn a non-success response into a `Response` error carrying the body
    async fn ensure_success(response: Response, action: &str) -> Result<Response, MemberDataError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());

        Err(MemberDataError::Response(format!(
            "Open Humans {} returned {}: {}",
            action, status, body
        )))
    }
}

#[async_trait::async_trait]
impl MemberDataStore for OpenHumansStore {
    async fn upload(
        &self,
        member: &MemberCredentials,
        upload: FileUpload,
    ) -> Result<FileId, MemberDataError> {
        let form = DirectUploadForm {
            project_member_id: &member.project_member_id,
            filename: &upload.filename,
            metadata: upload.metadata.to_string(),
        };

        tracing::debug!(filename = %upload.filename, "Requesting Open Humans direct upload");

        let response = self
            .client
            .post(self.endpoint("files/upload/direct"))
            .query(&[("access_token", member.access_token.as_str())])
            .form(&form)
            .send()
            .await
            .map_err(|e| MemberDataError::Request(format!("HTTP request failed: {}", e)))?;

        let target: DirectUploadResponse = Self::ensure_success(response, "direct upload")
            .await?
            .json()
            .await
            .map_err(|e| MemberDataError::Response(format!("Failed to parse response: {}", e)))?;

        let response = self
            .client
            .put(&target.url)
            .body(upload.content)
            .send()
            .await
            .map_err(|e| MemberDataError::Request(format!("Content upload failed: {}", e)))?;
        Self::ensure_success(response, "content upload").await?;

        let complete = FileForm {
            project_member_id: &member.project_member_id,
            file_id: target.id.0,
        };
        let response = self
            .client
            .post(self.endpoint("files/upload/complete"))
            .query(&[("access_token", member.access_token.as_str())])
            .form(&complete)
            .send()
            .await
            .map_err(|e| MemberDataError::Request(format!("HTTP request failed: {}", e)))?;
        Self::ensure_success(response, "upload completion").await?;

        tracing::debug!(file_id = %target.id, "Open Humans upload completed");
        Ok(target.id)
    }

    async fn list_files(
        &self,
        member: &MemberCredentials,
    ) -> Result<Vec<RemoteFile>, MemberDataError> {
        let response = self
            .client
            .get(self.endpoint("exchange-member"))
            .query(&[("access_token", member.access_token.as_str())])
            .send()
            .await
            .map_err(|e| MemberDataError::Request(format!("HTTP request failed: {}", e)))?;

        let exchange: ExchangeMemberResponse = Self::ensure_success(response, "exchange-member")
            .await?
            .json()
            .await
            .map_err(|e| MemberDataError::Response(format!("Failed to parse response: {}", e)))?;

        Ok(exchange.data)
    }

    async fn delete_single_file(
        &self,
        member: &MemberCredentials,
        file_id: FileId,
    ) -> Result<(), MemberDataError> {
        let form = FileForm {
            project_member_id: &member.project_member_id,
            file_id: file_id.0,
        };

        let response = self
            .client
            .post(self.endpoint("files/delete"))
            .query(&[("access_token", member.access_token.as_str())])
            .form(&form)
            .send()
            .await
            .map_err(|e| MemberDataError::Request(format!("HTTP request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MemberDataError::NotFound(format!("file {}", file_id)));
        }
        Self::ensure_success(response, "file delete").await?;

        tracing::debug!(file_id = %file_id, "Open Humans file deleted");
        Ok(())
    }

    async fn download(&self, download_url: &str) -> Result<Vec<u8>, MemberDataError> {
        let response = self
            .client
            .get(download_url)
            .send()
            .await
            .map_err(|e| MemberDataError::Request(format!("Download failed: {}", e)))?;

        let bytes = Self::ensure_success(response, "download")
            .await?
            .bytes()
            .await
            .map_err(|e| MemberDataError::Response(format!("Failed to read download: {}", e)))?;

        Ok(bytes.to_vec())
    }
}
