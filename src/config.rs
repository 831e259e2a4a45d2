//! Runtime configuration, read from the environment (and an optional `.env` file)

use std::path::PathBuf;
use anyhow::{Context, Result};

pub const DEFAULT_API_BASE: &str = "https://www.omdbapi.com/";
pub const DEFAULT_LOG_DIR: &str = ".logs";
pub const DEFAULT_WATCHED_SLOT: &str = "watched";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base: String,
    pub api_key: String,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub watched_slot: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("OMDB_API_KEY").context("OMDB_API_KEY not set")?;
        let api_base = get("OMDB_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let data_dir = match get("POPCORN_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .context("Could not determine data directory; set POPCORN_DATA_DIR")?
                .join("popcorn"),
        };

        let log_dir = get("POPCORN_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        let watched_slot = get("POPCORN_WATCHED_SLOT")
            .unwrap_or_else(|| DEFAULT_WATCHED_SLOT.to_string());

        Ok(Self {
            api_base,
            api_key,
            data_dir,
            log_dir,
            watched_slot,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("POPCORN_DATA_DIR", "/tmp/p")]))
            .unwrap_err();
        assert!(err.to_string().contains("OMDB_API_KEY"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let result = AppConfig::from_lookup(lookup_from(&[
            ("OMDB_API_KEY", "  "),
            ("POPCORN_DATA_DIR", "/tmp/p"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn defaults_apply_when_only_key_and_data_dir_are_set() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("OMDB_API_KEY", "abc123"),
            ("POPCORN_DATA_DIR", "/tmp/popcorn-data"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_key, "abc123");
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/popcorn-data"));
        assert_eq!(cfg.log_dir, PathBuf::from(DEFAULT_LOG_DIR));
        assert_eq!(cfg.watched_slot, "watched");
    }

    #[test]
    fn overrides_are_honoured() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("OMDB_API_KEY", "k"),
            ("OMDB_API_BASE", "http://localhost:9999/"),
            ("POPCORN_DATA_DIR", "/data"),
            ("POPCORN_LOG_DIR", "/logs"),
            ("POPCORN_WATCHED_SLOT", "watched-v2"),
        ]))
        .unwrap();
        assert_eq!(cfg.api_base, "http://localhost:9999/");
        assert_eq!(cfg.log_dir, PathBuf::from("/logs"));
        assert_eq!(cfg.watched_slot, "watched-v2");
    }
}
