//! User configuration read from `config.toml` in the platform config
//! directory. Every key is optional so an absent file means defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::data::{CatalogFill, ContentSource, ContentStore};

/// Name used for the config, data and log directories.
const APP_NAME: &str = "sura-reader";
/// Configuration file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";
/// Log file name inside the data directory.
const LOG_FILE_NAME: &str = "sura-reader.log";
/// Environment variable that overrides `log_filter`.
pub const LOG_ENV: &str = "SURA_READER_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub catalog_delay_ms: u64,
    pub chapter_delay_ms: u64,
    /// Directory that replaces the embedded JSON files.
    pub content_dir: Option<PathBuf>,
    pub catalog_fill: CatalogFill,
    /// Player command line; the verse URL is appended. Empty means the
    /// system's default handler.
    pub player: Vec<String>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_delay_ms: 500,
            chapter_delay_ms: 300,
            content_dir: None,
            catalog_fill: CatalogFill::Extras,
            player: vec![
                "mpv".to_string(),
                "--no-video".to_string(),
                "--really-quiet".to_string(),
            ],
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Read the file at `path`, or the default location when `None`. Only an
    /// explicitly requested file has to exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (default_config_path()?, false),
        };

        if !path.is_file() {
            if required {
                return Err(anyhow!("config file {} does not exist", path.display()));
            }
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config in {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("failed to parse config TOML")
    }

    /// Content store reflecting the configured source, latency and fill.
    pub fn content_store(&self) -> ContentStore {
        let source = match &self.content_dir {
            Some(dir) => ContentSource::Directory(dir.clone()),
            None => ContentSource::Embedded,
        };
        ContentStore::new(source)
            .with_delays(
                Duration::from_millis(self.catalog_delay_ms),
                Duration::from_millis(self.chapter_delay_ms),
            )
            .with_fill(self.catalog_fill)
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME).ok_or_else(|| anyhow!("could not locate home directory"))
}

/// Resolve the absolute path of `config.toml`.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE_NAME))
}

/// Resolve the absolute path of the log file, creating its directory.
pub fn log_file_path() -> Result<PathBuf> {
    let dir = project_dirs()?.data_dir().to_path_buf();
    fs::create_dir_all(&dir).context("failed to create data directory")?;
    Ok(dir.join(LOG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_means_defaults() {
        assert_eq!(AppConfig::parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn keys_override_defaults() {
        let config = AppConfig::parse(
            r#"
            catalog_delay_ms = 0
            catalog_fill = "full-range"
            player = []
            content_dir = "/srv/quran"
            "#,
        )
        .unwrap();
        assert_eq!(config.catalog_delay_ms, 0);
        assert_eq!(config.chapter_delay_ms, 300);
        assert_eq!(config.catalog_fill, CatalogFill::FullRange);
        assert!(config.player.is_empty());

        let store = config.content_store();
        assert_eq!(
            store.source(),
            &ContentSource::Directory(PathBuf::from("/srv/quran"))
        );
        assert_eq!(store.catalog_delay(), Duration::ZERO);
        assert_eq!(store.fill(), CatalogFill::FullRange);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(AppConfig::parse("catalog_delay = 1").is_err());
        assert!(AppConfig::parse(r#"catalog_fill = "everything""#).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("nope.toml"))).is_err());

        let path = dir.path().join("config.toml");
        fs::write(&path, "chapter_delay_ms = 5\n").unwrap();
        assert_eq!(AppConfig::load(Some(&path)).unwrap().chapter_delay_ms, 5);
    }
}
