use std::path::Path;

/// Extensions accepted by default, images first then videos.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "mp4", "webm", "mov", "mkv", "m4v",
];

const FALLBACK_MIME: &str = "application/octet-stream";

/// Detects the MIME type from the file's bytes. Files without a
/// recognisable signature are `application/octet-stream`, whatever their
/// extension claims.
pub fn sniff_mime(data: &[u8]) -> String {
    infer::get(data)
        .map(|kind| kind.mime_type().to_owned())
        .unwrap_or_else(|| FALLBACK_MIME.to_owned())
}

pub(crate) fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// What a signage player can do with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Image,
    Video,
    Unsupported,
}

impl ContentKind {
    pub fn from_mime(mime: &str) -> Self {
        match mime.split('/').next() {
            Some("image") => ContentKind::Image,
            Some("video") => ContentKind::Video,
            _ => ContentKind::Unsupported,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Image => "image",
            ContentKind::Video => "video",
            ContentKind::Unsupported => "unsupported",
        }
    }
}
