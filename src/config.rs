//! Store configuration read from the environment.

use crate::db::DbPath;
use crate::error::{Error, Result};

/// Environment variable holding the database path.
pub const DB_ENV: &str = "AAQ_DB";

/// Environment variable toggling `PRAGMA foreign_keys`.
pub const FOREIGN_KEYS_ENV: &str = "AAQ_FOREIGN_KEYS";

/// How to open the storage handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: DbPath,
    pub foreign_keys: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: DbPath::default_path(),
            foreign_keys: true,
        }
    }
}

impl StoreConfig {
    /// Build a config from `AAQ_DB` and `AAQ_FOREIGN_KEYS`, falling back to
    /// defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(DB_ENV).filter(|p| !p.trim().is_empty()) {
            config.path = DbPath::new(path);
        }

        if let Some(flag) = lookup(FOREIGN_KEYS_ENV) {
            config.foreign_keys = parse_flag(&flag).ok_or_else(|| {
                Error::InvalidConfig(format!("{FOREIGN_KEYS_ENV}={flag} is not a boolean"))
            })?;
        }

        Ok(config)
    }

    /// Replace the database path, e.g. from a `--db` flag.
    pub fn with_path(mut self, path: Option<DbPath>) -> Self {
        if let Some(path) = path {
            self.path = path;
        }
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, StoreConfig::default());
        assert!(config.foreign_keys);
        assert_eq!(config.path, DbPath::default_path());
    }

    #[test]
    fn test_reads_path_and_flag() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (DB_ENV, "/tmp/aaq.db"),
            (FOREIGN_KEYS_ENV, "off"),
        ]))
        .unwrap();
        assert_eq!(config.path, DbPath::new("/tmp/aaq.db"));
        assert!(!config.foreign_keys);
    }

    #[test]
    fn test_blank_path_ignored() {
        let config = StoreConfig::from_lookup(lookup_from(&[(DB_ENV, "  ")])).unwrap();
        assert_eq!(config.path, DbPath::default_path());
    }

    #[test]
    fn test_invalid_flag() {
        let result = StoreConfig::from_lookup(lookup_from(&[(FOREIGN_KEYS_ENV, "maybe")]));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_with_path_overrides() {
        let config = StoreConfig::default().with_path(Some(DbPath::new("other.db")));
        assert_eq!(config.path, DbPath::new("other.db"));

        let config = config.with_path(None);
        assert_eq!(config.path, DbPath::new("other.db"));
    }
}
