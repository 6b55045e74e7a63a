//! Configuration for roster.
//!
//! Everything that shapes stored data (collection name, blob path layout,
//! download host) is compiled in. The runtime [`Config`] only carries the
//! log level and a copy of those values for the components that need them.

use crate::{CoreError, CoreResult, Paths};
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Name of the document collection holding student records
/// (can be overridden at compile time via ROSTER_COLLECTION env var).
pub const STUDENTS_COLLECTION: &str = match option_env!("ROSTER_COLLECTION") {
    Some(name) => name,
    None => "students",
};

/// Blob path prefix for uploaded images.
pub const IMAGE_PREFIX: &str = "images";

/// Extension given to every uploaded image, whatever the source type.
pub const IMAGE_EXTENSION: &str = "jpg";

/// Base URL download references are resolved against
/// (can be overridden at compile time via ROSTER_DOWNLOAD_BASE_URL env var).
pub const DEFAULT_DOWNLOAD_BASE_URL: &str = match option_env!("ROSTER_DOWNLOAD_BASE_URL") {
    Some(url) => url,
    None => "http://localhost:9199/blobs/",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Document collection for student records.
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Base URL for blob download references.
    #[serde(default = "default_download_base_url")]
    pub download_base_url: String,
}

fn default_collection() -> String {
    STUDENTS_COLLECTION.to_string()
}

fn default_download_base_url() -> String {
    DEFAULT_DOWNLOAD_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            collection: STUDENTS_COLLECTION.to_string(),
            download_base_url: DEFAULT_DOWNLOAD_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `config.json`, falling back to defaults.
    ///
    /// `collection` and `download_base_url` are compile-time only and are
    /// forced back to the built-in values whatever the file says.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.collection = STUDENTS_COLLECTION.to_string();
        config.download_base_url = DEFAULT_DOWNLOAD_BASE_URL.to_string();

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Only the log level can be overridden at runtime.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("ROSTER_LOG_LEVEL") {
            if !log_level.trim().is_empty() {
                self.log_level = log_level.trim().to_string();
            }
        }
    }

    /// Parsed download base URL. Must end with `/` so blob paths join below it.
    pub fn download_base_url(&self) -> CoreResult<Url> {
        let url = Url::parse(&self.download_base_url).map_err(CoreError::from)?;
        if !url.path().ends_with('/') {
            return Err(CoreError::Config(format!(
                "download base URL must end with '/': {url}"
            )));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_uses_compiled_constants() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.collection, STUDENTS_COLLECTION);
        assert_eq!(config.download_base_url, DEFAULT_DOWNLOAD_BASE_URL);
    }

    #[test]
    fn load_from_file_reads_log_level() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        std::fs::write(&config_path, r#"{ "log_level": "debug" }"#).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.collection, STUDENTS_COLLECTION);
    }

    #[test]
    fn load_forces_compiled_values() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        std::fs::write(
            paths.config_file(),
            r#"{ "log_level": "warn", "collection": "teachers", "download_base_url": "https://evil.example/" }"#,
        )
        .unwrap();

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.collection, STUDENTS_COLLECTION);
        assert_eq!(config.download_base_url, DEFAULT_DOWNLOAD_BASE_URL);
    }

    #[test]
    fn load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.collection, STUDENTS_COLLECTION);
    }

    #[test]
    fn load_rejects_malformed_file() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        std::fs::write(paths.config_file(), "{ not json").unwrap();

        assert!(matches!(Config::load(&paths), Err(CoreError::Json(_))));
    }

    #[test]
    fn download_base_url_parses() {
        let url = Config::default().download_base_url().unwrap();
        assert!(url.path().ends_with('/'));
    }

    #[test]
    fn download_base_url_requires_trailing_slash() {
        let config = Config {
            download_base_url: "https://cdn.example/blobs".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.download_base_url(),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn image_path_constants() {
        assert_eq!(IMAGE_PREFIX, "images");
        assert_eq!(IMAGE_EXTENSION, "jpg");
        assert!(!STUDENTS_COLLECTION.is_empty());
    }
}
