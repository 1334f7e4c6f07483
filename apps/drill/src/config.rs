//! Runtime configuration read from the environment.

use std::path::PathBuf;

const DB_VAR: &str = "VOCAB_DRILL_DB";
const FUZZY_VAR: &str = "VOCAB_DRILL_FUZZY";
const LOG_VAR: &str = "RUST_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    /// Offer the one-time "check your spelling" retry on near misses.
    pub allow_fuzzy: bool,
    pub log_filter: String,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup(DB_VAR)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);

        let allow_fuzzy = match lookup(FUZZY_VAR) {
            Some(value) => parse_flag(&value).unwrap_or_else(|| {
                tracing::warn!("Ignoring invalid {}={:?}", FUZZY_VAR, value);
                true
            }),
            None => true,
        };

        Self {
            db_path,
            allow_fuzzy,
            log_filter: lookup(LOG_VAR).unwrap_or_else(|| "info".into()),
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vocab-drill")
        .join("vocab.db")
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]);
        assert!(config.allow_fuzzy);
        assert_eq!(config.log_filter, "info");
        assert!(config.db_path.ends_with("vocab-drill/vocab.db"));
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("VOCAB_DRILL_DB", "/tmp/words.db"),
            ("VOCAB_DRILL_FUZZY", "False"),
            ("RUST_LOG", "debug"),
        ]);
        assert_eq!(config.db_path, PathBuf::from("/tmp/words.db"));
        assert!(!config.allow_fuzzy);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn invalid_flag_keeps_default() {
        assert!(config(&[("VOCAB_DRILL_FUZZY", "maybe")]).allow_fuzzy);
    }
}
