//! File-backed JSON document store with named tables.

mod json_store;

pub use json_store::{DocId, Document, JsonDocumentStore, StoreError};
