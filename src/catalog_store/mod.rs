mod models;
mod store;
mod trait_def;

pub use models::{Playlist, StoredContent, Track, CONTENT_TABLE, PLAYLISTS_TABLE};
pub use trait_def::CatalogStore;
