//! Media file handling: supported types, MIME sniffing and copying imported
//! files into the managed media directory.

mod file_handler;
mod mime;

pub use file_handler::{MediaError, MediaLibrary, ProcessedFile, UploadedFile};
pub use mime::{sniff_mime, ContentKind, DEFAULT_ALLOWED_EXTENSIONS};
