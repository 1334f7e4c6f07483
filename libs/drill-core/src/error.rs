//! Error types for drill-core.

use crate::types::{ItemId, SheetId};
use thiserror::Error;

/// Result type alias using DrillError.
pub type Result<T> = std::result::Result<T, DrillError>;

/// Errors raised by the scheduling core and by Store implementations.
#[derive(Debug, Error)]
pub enum DrillError {
    #[error("sheet {0} has no items")]
    EmptySheet(SheetId),

    #[error("unknown item {0}")]
    UnknownItem(ItemId),

    #[error("unknown sheet {0}")]
    UnknownSheet(SheetId),

    #[error("no open presentation to answer")]
    NothingPresented,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DrillError {
    /// Wrap a backend failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage(Box::new(err))
    }
}

/// Catalog input that breaks a data-model constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be between 1 and {max} characters, got {len}")]
    Length {
        field: &'static str,
        max: usize,
        len: usize,
    },

    #[error("an item needs at least one answer")]
    NoAnswers,

    #[error("duplicate answer: {0}")]
    DuplicateAnswer(String),

    #[error("a direction needs two different languages")]
    SameLanguage,
}
