use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Optional TOML configuration. Every key can be left out.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Locations
    pub data_dir: Option<String>,
    pub db_path: Option<String>,
    pub templates_path: Option<String>,
    pub media_dir: Option<String>,

    // Import defaults
    pub name_prefix: Option<String>,
    pub default_duration: Option<u32>,
    pub allowed_extensions: Option<Vec<String>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
