//! Local SQLite database operations.

pub mod date_utils;
pub mod error;
pub mod repository;
pub mod schema;

pub use error::DbError;
pub use repository::{
    Direction, DirectionRepository, ItemRepository, ItemSummary, LanguageRepository, Sheet,
    SheetRepository, SqliteRepository, StatsRepository,
};
