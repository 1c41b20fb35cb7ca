//! Signage Import Tool
//!
//! Copies image and video files into the signage content catalog. With
//! `--playlist`, the named playlist is then rebuilt from the whole catalog.

use anyhow::{bail, Context, Result};
use clap::Parser;
use signage_importer::config::{AppConfig, CliConfig, FileConfig};
use signage_importer::item_template::CONTENT_KIND;
use signage_importer::playlist::{playlist_exists, rebuild_playlist};
use signage_importer::{Importer, ItemTemplates, JsonDocumentStore, MediaLibrary};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "signage-import")]
#[command(about = "Import content into the signage server")]
struct CliArgs {
    /// Image or video file to import
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /// Prefix prepended to each imported file name [default: imported-]
    #[arg(long)]
    name_prefix: Option<String>,

    /// If specified, replaces the named playlist's tracks with the whole catalog
    #[arg(long)]
    playlist: Option<String>,

    /// Default display duration, in seconds [default: 10]
    #[arg(long)]
    duration: Option<u32>,

    /// Directory holding db.json, item_templates.yaml and media/
    /// [default: data/ next to the executable]
    #[arg(long, value_parser = parse_path)]
    data_dir: Option<PathBuf>,

    /// Path to the JSON document store
    #[arg(long = "db", value_parser = parse_path)]
    db_path: Option<PathBuf>,

    /// Path to the item templates YAML file
    #[arg(long = "templates", value_parser = parse_path)]
    templates_path: Option<PathBuf>,

    /// Directory imported media is copied into
    #[arg(long, value_parser = parse_path)]
    media_dir: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(long, value_parser = parse_path)]
    config: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            data_dir: self.data_dir.clone(),
            db_path: self.db_path.clone(),
            templates_path: self.templates_path.clone(),
            media_dir: self.media_dir.clone(),
            name_prefix: self.name_prefix.clone(),
            duration: self.duration,
            playlist: self.playlist.clone(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli_args = CliArgs::parse();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let templates = ItemTemplates::load(&config.templates_path)?;
    let content_template = templates.get(CONTENT_KIND)?;
    let mut store = JsonDocumentStore::open(&config.db_path)?;

    if let Some(name) = &config.playlist {
        if !playlist_exists(&store, name) {
            bail!("Playlist {} does not exist", name);
        }
    }

    let media = MediaLibrary::new(&config.media_dir, &config.allowed_extensions);
    let report = Importer::new(&mut store, content_template, &media, &config.name_prefix)
        .import_files(&cli_args.files)?;

    info!(
        "Imported {} of {} files",
        report.imported_count(),
        report.outcomes.len()
    );
    if report.skipped_count() > 0 {
        warn!("Skipped {} files", report.skipped_count());
    }

    if let Some(name) = &config.playlist {
        rebuild_playlist(&mut store, name, config.duration)?;
    }

    Ok(())
}
