//! Local vocabulary drill application: SQLite storage, catalog and quiz commands.

pub mod commands;
pub mod config;
pub mod db;
pub mod state;

pub use config::Config;
pub use state::AppState;

use db::{DbError, SqliteRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber. Later calls are no-ops.
pub fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .ok();
}

/// Open the configured database, creating its directory if needed.
pub fn open(config: &Config) -> Result<AppState, DbError> {
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!("Opening database at {}", config.db_path.display());
    let repository = SqliteRepository::open(&config.db_path)?;
    Ok(AppState::new(repository, config.allow_fuzzy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::LanguageRepository;
    use pretty_assertions::assert_eq;

    #[test]
    fn open_creates_database_directory() {
        let dir = std::env::temp_dir().join(format!("vocab-drill-test-{}", std::process::id()));
        let config = Config {
            db_path: dir.join("nested").join("vocab.db"),
            allow_fuzzy: false,
            log_filter: "not a [valid filter".into(),
        };
        init_tracing(&config);

        let state = open(&config).unwrap();
        assert!(!state.allow_fuzzy);
        state.repository().unwrap().add_language("Basque").unwrap();
        assert_eq!(state.repository().unwrap().list_languages().unwrap(), vec!["Basque"]);
        assert!(config.db_path.exists());

        drop(state);
        std::fs::remove_dir_all(&dir).ok();
    }
}
