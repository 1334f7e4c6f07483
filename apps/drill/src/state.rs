//! Application state.

use crate::commands::CommandError;
use crate::db::SqliteRepository;
use drill_core::Session;
use std::sync::{Arc, Mutex, MutexGuard};

/// Global application state.
pub struct AppState {
    pub repository: Arc<Mutex<SqliteRepository>>,
    /// The quiz in progress, if any.
    pub session: Mutex<Option<Session>>,
    pub allow_fuzzy: bool,
}

impl AppState {
    pub fn new(repository: SqliteRepository, allow_fuzzy: bool) -> Self {
        Self {
            repository: Arc::new(Mutex::new(repository)),
            session: Mutex::new(None),
            allow_fuzzy,
        }
    }

    pub fn repository(&self) -> Result<MutexGuard<'_, SqliteRepository>, CommandError> {
        self.repository.lock().map_err(Into::into)
    }

    pub fn session(&self) -> Result<MutexGuard<'_, Option<Session>>, CommandError> {
        self.session.lock().map_err(Into::into)
    }
}
