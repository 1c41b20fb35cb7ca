#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::{json, Value};
use signage_importer::catalog_store::PLAYLISTS_TABLE;
use signage_importer::{CatalogStore, JsonDocumentStore, Playlist};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub data_dir: PathBuf,
    pub inputs_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let data_dir = tmp.path().join("data");
        let inputs_dir = tmp.path().join("inputs");
        std::fs::create_dir_all(&data_dir).expect("create data dir");
        std::fs::create_dir_all(&inputs_dir).expect("create inputs dir");

        let shipped_templates =
            Path::new(env!("CARGO_MANIFEST_DIR")).join("data/item_templates.yaml");
        std::fs::copy(shipped_templates, data_dir.join("item_templates.yaml"))
            .expect("copy item templates");

        Self {
            _tmp: tmp,
            data_dir,
            inputs_dir,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("db.json")
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("signage-import").expect("binary built");
        cmd.env("NO_COLOR", "1")
            .env("RUST_LOG", "info")
            .arg("--data-dir")
            .arg(&self.data_dir);
        cmd
    }

    pub fn write_file(&self, name: &str, data: &[u8]) -> PathBuf {
        let path = self.inputs_dir.join(name);
        std::fs::write(&path, data).expect("write input file");
        path
    }

    pub fn missing_file(&self, name: &str) -> PathBuf {
        self.inputs_dir.join(name)
    }

    pub fn store(&self) -> JsonDocumentStore {
        JsonDocumentStore::open(self.db_path()).expect("open store")
    }

    pub fn add_playlist(&self, name: &str) {
        let mut store = self.store();
        let doc = json!({"name": name, "tracks": []});
        store
            .insert(PLAYLISTS_TABLE, doc.as_object().unwrap().clone())
            .expect("insert playlist");
    }

    /// Content added by some other part of the signage system.
    pub fn add_content(&self, name: &str) {
        let mut store = self.store();
        let doc = json!({
            "name": name,
            "type": "image",
            "mimetype": "image/png",
            "filename": name,
            "path": name,
            "size": 1,
            "checksum": "0",
            "imported_at": "2024-01-01T00:00:00+00:00"
        });
        store
            .insert_content(doc.as_object().unwrap().clone())
            .expect("insert content");
    }

    pub fn content_names(&self) -> Vec<String> {
        self.store()
            .list_content()
            .expect("list content")
            .iter()
            .filter_map(|c| c.name().map(str::to_owned))
            .collect()
    }

    pub fn playlist(&self, name: &str) -> Playlist {
        self.store()
            .find_playlist(name)
            .expect("read playlist")
            .expect("playlist exists")
    }

    pub fn track_names(&self, name: &str) -> Vec<Value> {
        self.playlist(name)
            .tracks
            .iter()
            .map(|t| t.track["name"].clone())
            .collect()
    }
}
