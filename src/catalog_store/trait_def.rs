//! CatalogStore trait definition.

use super::models::{Playlist, StoredContent, Track};
use crate::document_store::{DocId, Document};
use anyhow::Result;

/// Storage backend for content items and playlists.
pub trait CatalogStore {
    /// Returns the first playlist whose name matches exactly.
    /// Returns None if there is no such playlist.
    fn find_playlist(&self, name: &str) -> Result<Option<Playlist>>;

    /// Whether a playlist with this exact name exists. Unlike
    /// `find_playlist`, the record's tracks are not parsed.
    fn playlist_exists(&self, name: &str) -> bool;

    /// Inserts a content record and returns its id.
    fn insert_content(&mut self, item: Document) -> Result<DocId>;

    /// Returns every content record, in insertion order.
    fn list_content(&self) -> Result<Vec<StoredContent>>;

    fn content_count(&self) -> usize;

    /// Overwrites the track list of the named playlist.
    /// Returns the number of playlists updated.
    fn set_playlist_tracks(&mut self, name: &str, tracks: &[Track]) -> Result<usize>;
}
