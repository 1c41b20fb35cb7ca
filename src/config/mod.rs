mod file_config;

pub use file_config::FileConfig;

use crate::importer::DEFAULT_NAME_PREFIX;
use crate::media::DEFAULT_ALLOWED_EXTENSIONS;
use crate::playlist::DEFAULT_DURATION_SECS;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;

pub const DB_FILE_NAME: &str = "db.json";
pub const TEMPLATES_FILE_NAME: &str = "item_templates.yaml";
pub const MEDIA_DIR_NAME: &str = "media";

/// Values given on the command line. `None` means the flag was not passed.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub data_dir: Option<PathBuf>,
    pub db_path: Option<PathBuf>,
    pub templates_path: Option<PathBuf>,
    pub media_dir: Option<PathBuf>,
    pub name_prefix: Option<String>,
    pub duration: Option<u32>,
    pub playlist: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub templates_path: PathBuf,
    pub media_dir: PathBuf,
    pub name_prefix: String,
    pub duration: u32,
    pub playlist: Option<String>,
    pub allowed_extensions: Vec<String>,
}

/// `data/` next to the running executable.
pub fn default_data_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Could not locate the running executable")?;
    let dir = exe
        .parent()
        .with_context(|| format!("Executable {:?} has no parent directory", exe))?;
    Ok(dir.join("data"))
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and an optional TOML file.
    /// An explicit CLI value wins over the file, the file wins over the
    /// built-in default. Paths not given explicitly live under the data dir.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let data_dir = match cli.data_dir.clone().or_else(|| file.data_dir.map(PathBuf::from)) {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        let db_path = cli
            .db_path
            .clone()
            .or_else(|| file.db_path.map(PathBuf::from))
            .unwrap_or_else(|| data_dir.join(DB_FILE_NAME));
        let templates_path = cli
            .templates_path
            .clone()
            .or_else(|| file.templates_path.map(PathBuf::from))
            .unwrap_or_else(|| data_dir.join(TEMPLATES_FILE_NAME));
        let media_dir = cli
            .media_dir
            .clone()
            .or_else(|| file.media_dir.map(PathBuf::from))
            .unwrap_or_else(|| data_dir.join(MEDIA_DIR_NAME));

        if db_path.is_dir() {
            bail!("Database path is a directory: {:?}", db_path);
        }
        if media_dir.exists() && !media_dir.is_dir() {
            bail!("media_dir is not a directory: {:?}", media_dir);
        }

        let name_prefix = cli
            .name_prefix
            .clone()
            .or(file.name_prefix)
            .unwrap_or_else(|| DEFAULT_NAME_PREFIX.to_owned());
        let duration = cli
            .duration
            .or(file.default_duration)
            .unwrap_or(DEFAULT_DURATION_SECS);

        let allowed_extensions = file.allowed_extensions.unwrap_or_else(|| {
            DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect()
        });
        if allowed_extensions.is_empty() {
            bail!("allowed_extensions must not be empty");
        }

        Ok(AppConfig {
            db_path,
            templates_path,
            media_dir,
            name_prefix,
            duration,
            playlist: cli.playlist.clone(),
            allowed_extensions,
        })
    }
}
