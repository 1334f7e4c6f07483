//! Database error types.

use drill_core::{DrillError, ItemId, SheetId, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("sheet not found: {0}")]
    SheetNotFound(SheetId),

    #[error("language not found: {0}")]
    LanguageNotFound(String),

    #[error("already exists: {0}")]
    Duplicate(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl From<DbError> for DrillError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::ItemNotFound(id) => DrillError::UnknownItem(id),
            DbError::SheetNotFound(id) => DrillError::UnknownSheet(id),
            DbError::Validation(v) => DrillError::Validation(v),
            other => DrillError::storage(other),
        }
    }
}
