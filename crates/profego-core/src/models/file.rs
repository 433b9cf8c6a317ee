use std::fmt;

use serde::{Deserialize, Serialize};

/// Classification of a stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    /// As uploaded by the user.
    Original,
    /// Text extraction derived from an original.
    Procesado,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Original => "original",
            FileCategory::Procesado => "procesado",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the file gallery listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    /// Human-readable type label assigned by the backend ("PDF", "Imagen",
    /// "TXT Procesado", ...).
    #[serde(rename = "type")]
    pub file_type: String,
    /// Pre-formatted size label ("1.25 MB").
    pub size: String,
    pub category: FileCategory,
    #[serde(default)]
    pub date: Option<String>,
}

/// A file payload for the multipart endpoints.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Result of a multipart upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub success: bool,
    pub files_uploaded: u32,
    pub files_processed: u32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Server-side preview of a stored file.
#[derive(Debug, Clone)]
pub enum FilePreview {
    /// Extracted text; `.txt` files come back as a JSON `{content}` body.
    Text { content: String },
    /// Raw file bytes for the view layer to render.
    Binary {
        content_type: String,
        bytes: Vec<u8>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_entry_parses_backend_row() {
        let json = r#"{
            "name": "plan_estudios.pdf",
            "type": "PDF",
            "size": "2.4 MB",
            "category": "original",
            "date": "2025-05-12"
        }"#;
        let entry: FileEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.name, "plan_estudios.pdf");
        assert_eq!(entry.file_type, "PDF");
        assert_eq!(entry.category, FileCategory::Original);
    }

    #[test]
    fn category_round_trips_lowercase() {
        assert_eq!(
            serde_json::to_string(&FileCategory::Procesado).unwrap(),
            "\"procesado\""
        );
        let parsed: FileCategory = serde_json::from_str("\"original\"").unwrap();
        assert_eq!(parsed, FileCategory::Original);
        assert_eq!(parsed.to_string(), "original");
    }
}
