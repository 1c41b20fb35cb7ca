use super::models::{Playlist, StoredContent, Track, CONTENT_TABLE, PLAYLISTS_TABLE};
use super::trait_def::CatalogStore;
use crate::document_store::{DocId, Document, JsonDocumentStore};
use anyhow::{Context, Result};
use serde_json::Value;

impl CatalogStore for JsonDocumentStore {
    fn find_playlist(&self, name: &str) -> Result<Option<Playlist>> {
        let Some((id, doc)) = self.find_first(PLAYLISTS_TABLE, "name", &Value::from(name)) else {
            return Ok(None);
        };
        let mut playlist: Playlist = serde_json::from_value(Value::Object(doc.clone()))
            .with_context(|| format!("Malformed playlist record {} ({})", id, name))?;
        playlist.id = id;
        Ok(Some(playlist))
    }

    fn playlist_exists(&self, name: &str) -> bool {
        self.find_first(PLAYLISTS_TABLE, "name", &Value::from(name))
            .is_some()
    }

    fn insert_content(&mut self, item: Document) -> Result<DocId> {
        Ok(self.insert(CONTENT_TABLE, item)?)
    }

    fn list_content(&self) -> Result<Vec<StoredContent>> {
        Ok(self
            .all(CONTENT_TABLE)
            .into_iter()
            .map(|(id, fields)| StoredContent { id, fields })
            .collect())
    }

    fn content_count(&self) -> usize {
        self.len(CONTENT_TABLE)
    }

    fn set_playlist_tracks(&mut self, name: &str, tracks: &[Track]) -> Result<usize> {
        let mut fields = Document::new();
        fields.insert("tracks".to_owned(), serde_json::to_value(tracks)?);
        let updated = self.update_where(PLAYLISTS_TABLE, "name", &Value::from(name), &fields)?;
        Ok(updated.len())
    }
}
