//! Typed file-sharing endpoints.
//!
//! Thin wrappers over [`ApiClient::request`]; every call carries the same
//! authentication and error mapping.

use reqwest::Method;

use super::client::{ApiClient, Body};
use super::error::ApiError;
use super::transport::MultipartForm;
use crate::auth::UserRecord;
use crate::models::file::{FileResponse, FilesResponse, MessageResponse};
use crate::models::{DownloadLink, FileEntry};
use crate::utils::{format_file_size, validate_file_extension};

/// Extensions the server accepts for upload
pub const ALLOWED_UPLOAD_EXTENSIONS: [&str; 3] = ["pptx", "docx", "xlsx"];

/// Server-side upload size limit (16 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// Multipart field carrying the uploaded file
const UPLOAD_FIELD: &str = "file";

impl ApiClient {
    /// List every shared file (client role)
    pub async fn list_files(&self) -> Result<Vec<FileEntry>, ApiError> {
        let response: FilesResponse = self.request_as("/api/files", Method::GET, None).await?;
        Ok(response.files)
    }

    /// Fetch a single file's details
    pub async fn file_details(&self, file_id: i64) -> Result<FileEntry, ApiError> {
        let url = format!("/api/files/{}", file_id);
        let response: FileResponse = self.request_as(&url, Method::GET, None).await?;
        Ok(response.file)
    }

    /// Get a one-time download link for a file (client role)
    pub async fn download_link(&self, file_id: i64) -> Result<DownloadLink, ApiError> {
        let url = format!("/api/download-file/{}", file_id);
        self.request_as(&url, Method::GET, None).await
    }

    /// Delete a file (operations role). Returns the server's message.
    pub async fn delete_file(&self, file_id: i64) -> Result<String, ApiError> {
        let url = format!("/api/files/{}", file_id);
        let response: MessageResponse = self.request_as(&url, Method::DELETE, None).await?;
        Ok(response.message)
    }

    /// Upload a file (operations role).
    ///
    /// Files the server would refuse for type or size are rejected here
    /// without a request.
    pub async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> Result<FileEntry, ApiError> {
        if !validate_file_extension(filename, &ALLOWED_UPLOAD_EXTENSIONS) {
            return Err(ApiError::Rejected(format!(
                "File type not allowed. Allowed types: {}",
                ALLOWED_UPLOAD_EXTENSIONS.join(", ")
            )));
        }
        let size = bytes.len() as u64;
        if size > MAX_UPLOAD_BYTES {
            return Err(ApiError::Rejected(format!(
                "File is too large ({}). Maximum size is {}",
                format_file_size(size),
                format_file_size(MAX_UPLOAD_BYTES)
            )));
        }

        let form = MultipartForm::new().file(UPLOAD_FIELD, filename, bytes);
        let response: FileResponse = self
            .request_as("/api/upload", Method::POST, Some(Body::Multipart(form)))
            .await?;
        Ok(response.file)
    }

    /// The signed-in user's profile as the server sees it
    pub async fn profile(&self) -> Result<UserRecord, ApiError> {
        self.request_as("/api/user/profile", Method::GET, None).await
    }
}
