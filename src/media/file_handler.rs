//! Turning a file on disk into a catalog record.

use super::mime::{extension_of, sniff_mime, ContentKind};
use crate::document_store::Document;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while handling a media file.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),
}

/// A file held in memory together with its detected type, the way a web
/// upload would reach the processor.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Reads the whole file and sniffs its MIME type.
    pub fn read(path: &Path) -> Result<Self, MediaError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MediaError::InvalidFilename(path.display().to_string()))?
            .to_owned();
        let data = std::fs::read(path)?;
        let content_type = sniff_mime(&data);
        Ok(Self {
            filename,
            content_type,
            data,
        })
    }
}

/// The managed directory imported media is copied into.
#[derive(Debug, Clone)]
pub struct MediaLibrary {
    media_dir: PathBuf,
    allowed_extensions: Vec<String>,
}

impl MediaLibrary {
    pub fn new(media_dir: impl Into<PathBuf>, allowed_extensions: &[String]) -> Self {
        Self {
            media_dir: media_dir.into(),
            allowed_extensions: allowed_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Check if a file has one of the supported extensions.
    pub fn is_allowed(&self, filename: &str) -> bool {
        extension_of(filename)
            .map(|ext| self.allowed_extensions.contains(&ext))
            .unwrap_or(false)
    }

    /// Derives the record fields for an upload without touching the disk.
    /// The `type` field is `unsupported` for anything that is not an image
    /// or a video; rejecting such records is left to template validation.
    pub fn process_file(&self, upload: &UploadedFile) -> Result<ProcessedFile, MediaError> {
        let safe_filename = sanitize_filename(&upload.filename)?;
        let checksum = format!("{:x}", Sha256::digest(&upload.data));
        let stored_name = format!("{}-{}", &checksum[..16], safe_filename);

        let kind = ContentKind::from_mime(&upload.content_type);
        let mut record = Document::new();
        record.insert("type".to_owned(), Value::from(kind.as_str()));
        record.insert("mimetype".to_owned(), Value::from(upload.content_type.as_str()));
        record.insert("filename".to_owned(), Value::from(upload.filename.as_str()));
        record.insert("path".to_owned(), Value::from(stored_name.as_str()));
        record.insert("size".to_owned(), Value::from(upload.data.len() as u64));
        record.insert("checksum".to_owned(), Value::from(checksum));
        record.insert(
            "imported_at".to_owned(),
            Value::from(chrono::Utc::now().to_rfc3339()),
        );
        Ok(ProcessedFile {
            record,
            stored_name,
        })
    }

    /// Copies the upload into the media directory under the name chosen by
    /// `process_file`. Identical content under the same name is written once.
    pub fn save_file(&self, upload: &UploadedFile, processed: &ProcessedFile) -> Result<PathBuf, MediaError> {
        std::fs::create_dir_all(&self.media_dir)?;
        let stored_path = self.media_dir.join(&processed.stored_name);
        if !stored_path.exists() {
            std::fs::write(&stored_path, &upload.data)?;
        }
        Ok(stored_path)
    }
}

/// A record derived from an upload, plus the name its bytes will be stored
/// under once the record is accepted.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub record: Document,
    stored_name: String,
}

impl ProcessedFile {
    pub fn stored_name(&self) -> &str {
        &self.stored_name
    }
}

/// Keeps only the final path component and replaces characters that are
/// unsafe on common filesystems.
fn sanitize_filename(filename: &str) -> Result<String, MediaError> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| MediaError::InvalidFilename(filename.to_string()))?;

    if name.contains('\0') || name.starts_with('.') {
        return Err(MediaError::InvalidFilename(filename.to_string()));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() => '_',
            _ => c,
        })
        .collect();

    if sanitized.is_empty() {
        return Err(MediaError::InvalidFilename(filename.to_string()));
    }
    Ok(sanitized)
}
