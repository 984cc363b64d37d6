use crate::error::Error;
use config::{Config, File as ConfigFile};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_DB_PATH: &str = "classified.db";
pub const DEFAULT_LOG_FILE: &str = "./logs/finder.log";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub root_paths: Vec<String>,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    #[serde(default = "default_db_path")]
    pub db_path: String,
    /// `EnvFilter` directive, e.g. `info` or `media_finder=debug`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_paths: Vec::new(),
            extensions: default_extensions(),
            ignore_patterns: Vec::new(),
            db_path: default_db_path(),
            log_level: default_log_level(),
            log_file: default_log_file(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec![".mp4".to_string(), ".mkv".to_string(), ".avi".to_string()]
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}

pub fn load_configuration() -> Result<AppConfig, Error> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    Ok(builder.try_deserialize::<AppConfig>()?)
}

/// Drop roots nested under (or equal to) another root so nothing is walked
/// twice. Survivors come back shallowest first, then by name.
pub fn non_overlapping_directories(dirs: Vec<String>) -> Vec<String> {
    let depth = |dir: &String| Path::new(dir).components().count();
    let mut sorted = dirs;
    sorted.sort_by(|a, b| depth(a).cmp(&depth(b)).then_with(|| a.cmp(b)));

    let mut kept: Vec<String> = Vec::new();
    for dir in sorted {
        if !kept.iter().any(|root| Path::new(&dir).starts_with(root)) {
            kept.push(dir);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.root_paths.is_empty());
        assert_eq!(config.extensions, vec![".mp4", ".mkv", ".avi"]);
        assert_eq!(config.db_path, "classified.db");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_file, "./logs/finder.log");
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(ConfigFile::from_str(
                "root_paths = [\"/media/films\"]",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.root_paths, vec!["/media/films"]);
        assert_eq!(config.extensions.len(), 3);
        assert!(config.ignore_patterns.is_empty());
    }

    #[test]
    fn test_non_overlapping_no_overlap() {
        let dirs = vec![
            "/media/films".to_string(),
            "/media/series".to_string(),
            "/var/data".to_string(),
        ];
        let result = non_overlapping_directories(dirs);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_non_overlapping_with_subdirectory() {
        let dirs = vec![
            "/media/films/2018".to_string(),
            "/media/films/2019".to_string(),
            "/media/films".to_string(),
        ];
        let result = non_overlapping_directories(dirs);
        assert_eq!(result, vec!["/media/films".to_string()]);
    }

    #[test]
    fn test_non_overlapping_skips_nested_later_entry() {
        let dirs = vec!["/media".to_string(), "/media/films".to_string()];
        let result = non_overlapping_directories(dirs);
        assert_eq!(result, vec!["/media".to_string()]);
    }

    #[test]
    fn test_non_overlapping_drops_repeats_and_name_prefixes_survive() {
        let dirs = vec![
            "/media/films-old".to_string(),
            "/media/films".to_string(),
            "/media/films/".to_string(),
            "/media/films".to_string(),
        ];
        let result = non_overlapping_directories(dirs);
        assert_eq!(
            result,
            vec!["/media/films".to_string(), "/media/films-old".to_string()]
        );
    }
}
