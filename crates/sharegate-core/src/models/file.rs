use serde::{Deserialize, Serialize};

use crate::utils::format_file_size;

/// A shared file as listed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: i64,
    /// Original filename as uploaded
    pub filename: String,
    pub file_type: String,
    /// Size in bytes
    pub file_size: u64,
    /// Username of the uploader
    pub uploader: String,
    /// `YYYY-MM-DD HH:MM:SS`, server local time
    pub uploaded_at: String,
}

impl FileEntry {
    pub fn display_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadLink {
    #[serde(rename = "download-link")]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FilesResponse {
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileResponse {
    pub file: FileEntry,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_files_response() {
        let json = r#"{"files":[{"id":3,"filename":"Q3.xlsx","file_type":"xlsx","file_size":2048,"uploader":"ops","uploaded_at":"2024-05-01 10:00:00"}]}"#;
        let parsed: FilesResponse = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.files.len(), 1);
        let file = &parsed.files[0];
        assert_eq!(file.filename, "Q3.xlsx");
        assert_eq!(file.display_size(), "2.00 KB");
    }

    #[test]
    fn test_parse_download_link() {
        let link: DownloadLink =
            serde_json::from_str(r#"{"download-link":"http://x/api/download/t","message":"success"}"#)
                .unwrap();
        assert_eq!(link.url, "http://x/api/download/t");
    }
}
