//! Environment-driven runtime settings.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `TTTWITTER_DB_PATH` | SQLite database file | `<temp_dir>/tttwitter.sqlite3` |
//! | `TTTWITTER_LOG_LEVEL` | `trace\|debug\|info\|warn\|error` | [`default_log_level`] |
//! | `TTTWITTER_LOG_DIR` | absolute log directory | unset: logging stays off |
//!
//! Blank values count as unset.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "TTTWITTER_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "TTTWITTER_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "TTTWITTER_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "tttwitter.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_VAR).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_VAR).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_VAR, LOG_DIR_VAR, LOG_LEVEL_VAR};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> CoreConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("tttwitter.sqlite3")
        );
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn values_are_trimmed_and_blanks_ignored() {
        let config = config_from(&[
            (DB_PATH_VAR, "  /var/lib/tttwitter/app.db "),
            (LOG_LEVEL_VAR, " warn"),
            (LOG_DIR_VAR, "   "),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/var/lib/tttwitter/app.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
    }
}
