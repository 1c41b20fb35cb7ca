//! Importing media files into the content collection.
//!
//! Every file is handled on its own: a missing, unsupported, invalid or
//! badly named file is reported and skipped, and the batch carries on.
//! I/O and store errors are not per-file problems and end the run.

use crate::catalog_store::CatalogStore;
use crate::document_store::DocId;
use crate::item_template::{ItemTemplate, Violation};
use crate::media::{MediaError, MediaLibrary, UploadedFile};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_NAME_PREFIX: &str = "imported-";

#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    Imported { id: DocId },
    Missing,
    Unsupported,
    Invalid { problems: Vec<Violation> },
    Failed { reason: String },
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub outcomes: Vec<(PathBuf, ImportOutcome)>,
}

impl ImportReport {
    pub fn imported_ids(&self) -> Vec<DocId> {
        self.outcomes
            .iter()
            .filter_map(|(_, outcome)| match outcome {
                ImportOutcome::Imported { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn imported_count(&self) -> usize {
        self.imported_ids().len()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.imported_count()
    }
}

pub struct Importer<'a, S: CatalogStore> {
    store: &'a mut S,
    template: &'a ItemTemplate,
    media: &'a MediaLibrary,
    name_prefix: &'a str,
}

impl<'a, S: CatalogStore> Importer<'a, S> {
    pub fn new(
        store: &'a mut S,
        template: &'a ItemTemplate,
        media: &'a MediaLibrary,
        name_prefix: &'a str,
    ) -> Self {
        Self {
            store,
            template,
            media,
            name_prefix,
        }
    }

    pub fn import_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<ImportReport> {
        let mut report = ImportReport::default();
        for path in paths {
            let path = path.as_ref();
            let outcome = self.import_file(path)?;
            report.outcomes.push((path.to_path_buf(), outcome));
        }
        Ok(report)
    }

    pub fn import_file(&mut self, path: &Path) -> Result<ImportOutcome> {
        if !path.is_file() {
            warn!("{} does not exist, skipping...", path.display());
            return Ok(ImportOutcome::Missing);
        }
        if !self.media.is_allowed(&path.to_string_lossy()) {
            warn!("{} is not a supported filetype, skipping...", path.display());
            return Ok(ImportOutcome::Unsupported);
        }

        let upload = match UploadedFile::read(path) {
            Ok(upload) => upload,
            Err(err) => return skip_bad_name(path, err),
        };
        debug!("{} detected as {}", path.display(), upload.content_type);

        let mut processed = match self.media.process_file(&upload) {
            Ok(processed) => processed,
            Err(err) => return skip_bad_name(path, err),
        };
        processed.record.insert(
            "name".to_owned(),
            Value::from(format!("{}{}", self.name_prefix, upload.filename)),
        );

        if let Err(problems) = self.template.validate(&processed.record) {
            let summary: Vec<String> = problems.iter().map(|p| p.to_string()).collect();
            warn!(
                "{} is not a valid content item ({}), skipping...",
                path.display(),
                summary.join(", ")
            );
            return Ok(ImportOutcome::Invalid { problems });
        }

        self.media
            .save_file(&upload, &processed)
            .with_context(|| format!("Failed to copy {} into the media directory", path.display()))?;
        let id = self
            .store
            .insert_content(processed.record)
            .with_context(|| format!("Failed to store content record for {}", path.display()))?;
        info!("Imported id {}", id);
        Ok(ImportOutcome::Imported { id })
    }
}

/// A file whose name can't be stored is skipped; any other media error
/// aborts the run.
fn skip_bad_name(path: &Path, err: MediaError) -> Result<ImportOutcome> {
    match err {
        MediaError::InvalidFilename(name) => {
            warn!("{} has an unusable file name, skipping...", path.display());
            Ok(ImportOutcome::Failed {
                reason: format!("Invalid filename: {}", name),
            })
        }
        other => Err(other).with_context(|| format!("Failed to read {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_store::JsonDocumentStore;
    use crate::item_template::{ItemTemplates, CONTENT_KIND};
    use crate::media::DEFAULT_ALLOWED_EXTENSIONS;
    use serde_json::json;
    use tempfile::TempDir;

    const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00];
    const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

    const TEMPLATES: &str = r#"
content:
  name: string
  filename: string
  mimetype: string
  size: integer
  type:
    type: string
    one_of: [image, video]
"#;

    struct Fixture {
        dir: TempDir,
        store: JsonDocumentStore,
        template: ItemTemplate,
        media: MediaLibrary,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let allowed: Vec<String> = DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect();
            let media = MediaLibrary::new(dir.path().join("media"), &allowed);
            let template = ItemTemplates::parse(TEMPLATES)
                .unwrap()
                .get(CONTENT_KIND)
                .unwrap()
                .clone();
            Self {
                dir,
                store: JsonDocumentStore::in_memory(),
                template,
                media,
            }
        }

        fn write(&self, name: &str, data: &[u8]) -> PathBuf {
            let path = self.dir.path().join(name);
            std::fs::write(&path, data).unwrap();
            path
        }

        fn run(&mut self, prefix: &str, paths: &[PathBuf]) -> ImportReport {
            Importer::new(&mut self.store, &self.template, &self.media, prefix)
                .import_files(paths)
                .unwrap()
        }
    }

    #[test]
    fn test_imports_supported_and_skips_unsupported() {
        let mut fixture = Fixture::new();
        let paths = vec![
            fixture.write("a.jpg", JPEG_BYTES),
            fixture.write("b.txt", b"hello"),
            fixture.write("c.png", PNG_BYTES),
        ];

        let report = fixture.run(DEFAULT_NAME_PREFIX, &paths);

        assert_eq!(report.imported_ids(), vec![1, 2]);
        assert_eq!(report.outcomes[1].1, ImportOutcome::Unsupported);
        assert_eq!(report.skipped_count(), 1);
        let names: Vec<_> = fixture
            .store
            .list_content()
            .unwrap()
            .iter()
            .map(|c| c.name().unwrap().to_owned())
            .collect();
        assert_eq!(names, vec!["imported-a.jpg", "imported-c.png"]);
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let mut fixture = Fixture::new();
        let missing = fixture.dir.path().join("gone.jpg");
        let present = fixture.write("here.png", PNG_BYTES);

        let report = fixture.run(DEFAULT_NAME_PREFIX, &[missing, present]);

        assert_eq!(report.outcomes[0].1, ImportOutcome::Missing);
        assert_eq!(report.imported_count(), 1);
        assert_eq!(fixture.store.content_count(), 1);
    }

    #[test]
    fn test_directory_counts_as_missing() {
        let mut fixture = Fixture::new();
        let dir = fixture.dir.path().join("folder.jpg");
        std::fs::create_dir(&dir).unwrap();

        let report = fixture.run(DEFAULT_NAME_PREFIX, &[dir]);

        assert_eq!(report.outcomes[0].1, ImportOutcome::Missing);
    }

    #[test]
    fn test_custom_prefix() {
        let mut fixture = Fixture::new();
        let path = fixture.write("poster.png", PNG_BYTES);

        fixture.run("lobby-", &[path]);

        let content = fixture.store.list_content().unwrap();
        assert_eq!(content[0].name(), Some("lobby-poster.png"));
        assert_eq!(content[0].fields["type"], json!("image"));
    }

    #[test]
    fn test_invalid_record_is_not_inserted() {
        let mut fixture = Fixture::new();
        // Allowed extension but the bytes are a PDF.
        let path = fixture.write("fake.jpg", b"%PDF-1.4 not an image");

        let report = fixture.run(DEFAULT_NAME_PREFIX, &[path]);

        match &report.outcomes[0].1 {
            ImportOutcome::Invalid { problems } => {
                assert!(problems
                    .iter()
                    .any(|p| matches!(p, Violation::NotAllowed { field, .. } if field == "type")));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(fixture.store.content_count(), 0);
    }

    #[test]
    fn test_unsniffable_file_is_invalid() {
        let mut fixture = Fixture::new();
        let path = fixture.write("notes.jpg", b"just some plain text, not a picture");

        let report = fixture.run(DEFAULT_NAME_PREFIX, &[path]);

        assert!(matches!(report.outcomes[0].1, ImportOutcome::Invalid { .. }));
        assert_eq!(fixture.store.content_count(), 0);
    }

    #[test]
    fn test_invalid_record_leaves_media_dir_untouched() {
        let mut fixture = Fixture::new();
        let path = fixture.write("fake.png", b"%PDF-1.4 not an image");

        fixture.run(DEFAULT_NAME_PREFIX, &[path]);

        let media_dir = fixture.media.media_dir();
        let stored = if media_dir.exists() {
            std::fs::read_dir(media_dir).unwrap().count()
        } else {
            0
        };
        assert_eq!(stored, 0);
    }

    #[test]
    fn test_imported_file_is_copied_to_media_dir() {
        let mut fixture = Fixture::new();
        let path = fixture.write("poster.png", PNG_BYTES);

        fixture.run(DEFAULT_NAME_PREFIX, &[path]);

        let content = fixture.store.list_content().unwrap();
        let stored = content[0].fields["path"].as_str().unwrap();
        assert_eq!(
            std::fs::read(fixture.media.media_dir().join(stored)).unwrap(),
            PNG_BYTES
        );
    }

    struct FailingStore;

    impl CatalogStore for FailingStore {
        fn find_playlist(&self, _name: &str) -> Result<Option<crate::Playlist>> {
            Ok(None)
        }

        fn playlist_exists(&self, _name: &str) -> bool {
            false
        }

        fn insert_content(&mut self, _fields: crate::document_store::Document) -> Result<DocId> {
            Err(anyhow::anyhow!("disk full"))
        }

        fn list_content(&self) -> Result<Vec<crate::catalog_store::StoredContent>> {
            Ok(Vec::new())
        }

        fn content_count(&self) -> usize {
            0
        }

        fn set_playlist_tracks(&mut self, _name: &str, _tracks: &[crate::Track]) -> Result<usize> {
            Ok(0)
        }
    }

    #[test]
    fn test_store_error_aborts_import() {
        let fixture = Fixture::new();
        let first = fixture.write("a.png", PNG_BYTES);
        let second = fixture.write("b.png", PNG_BYTES);
        let mut store = FailingStore;

        let result = Importer::new(&mut store, &fixture.template, &fixture.media, DEFAULT_NAME_PREFIX)
            .import_files(&[first, second]);

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("disk full"));
    }
}
