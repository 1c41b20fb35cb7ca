//! Signage Importer Library
//!
//! Imports image and video files into the signage content catalog and
//! optionally rebuilds a playlist from it. The modules are exposed for the
//! `signage-import` binary and for testing.

pub mod catalog_store;
pub mod config;
pub mod document_store;
pub mod importer;
pub mod item_template;
pub mod media;
pub mod playlist;

// Re-export commonly used types for convenience
pub use catalog_store::{CatalogStore, Playlist, Track};
pub use document_store::JsonDocumentStore;
pub use importer::{ImportOutcome, ImportReport, Importer};
pub use item_template::ItemTemplates;
pub use media::MediaLibrary;
