//! Records kept in the signage catalog.

use crate::document_store::{DocId, Document};
use serde::{Deserialize, Serialize};

pub const CONTENT_TABLE: &str = "content";
pub const PLAYLISTS_TABLE: &str = "playlists";

/// A content item as read back from the catalog.
///
/// Content may have been added by other tools, so the fields are kept as a
/// free-form document rather than a fixed struct.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredContent {
    pub id: DocId,
    pub fields: Document,
}

impl StoredContent {
    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(|v| v.as_str())
    }
}

/// One entry of a playlist. `track` is a snapshot of the content record at
/// the time the playlist was built, not a reference to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub duration: u32,
    pub seq: usize,
    pub track: Document,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(skip)]
    pub id: DocId,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
    /// Fields owned by other parts of the signage system.
    #[serde(flatten)]
    pub extra: Document,
}
