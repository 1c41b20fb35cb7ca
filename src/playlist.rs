//! Playlist lookup and rebuilding.
//!
//! A rebuild mirrors the whole content collection into the playlist: every
//! content item currently stored becomes one track, in store order, with the
//! same display duration. The previous track list is discarded, so running a
//! rebuild twice yields the same playlist rather than duplicated tracks.

use crate::catalog_store::{CatalogStore, Playlist, StoredContent, Track};
use anyhow::{bail, Result};
use tracing::info;

pub const DEFAULT_DURATION_SECS: u32 = 10;

pub fn find_playlist(store: &impl CatalogStore, name: &str) -> Result<Option<Playlist>> {
    store.find_playlist(name)
}

/// Existence check used before importing. The stored tracks are replaced
/// by a rebuild, so their shape doesn't matter here.
pub fn playlist_exists(store: &impl CatalogStore, name: &str) -> bool {
    store.playlist_exists(name)
}

/// Builds one track per content item; `seq` is the position in `content`.
pub fn build_tracks(content: Vec<StoredContent>, duration: u32) -> Vec<Track> {
    content
        .into_iter()
        .enumerate()
        .map(|(seq, item)| Track {
            duration,
            seq,
            track: item.fields,
        })
        .collect()
}

/// Replaces the tracks of playlist `name` with the full content collection.
/// Returns the number of tracks written.
pub fn rebuild_playlist(store: &mut impl CatalogStore, name: &str, duration: u32) -> Result<usize> {
    let tracks = build_tracks(store.list_content()?, duration);
    let updated = store.set_playlist_tracks(name, &tracks)?;
    if updated == 0 {
        bail!("Playlist {} does not exist", name);
    }
    info!(
        "Playlist {} now has {} tracks of {}s each",
        name,
        tracks.len(),
        duration
    );
    Ok(tracks.len())
}
