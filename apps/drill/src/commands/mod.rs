//! Commands exposed to the presentation layer.

pub mod catalog;
pub mod stats;
pub mod study;

use std::sync::PoisonError;

pub use catalog::{
    add_item, add_language, create_sheet, delete_item, delete_language, delete_sheet, edit_item,
    get_item, list_languages, list_sheets, rename_language, search_items, sheet_items,
    update_sheet, DirectionRequest, ItemChanges, ItemRequest, ItemView, SheetRequest,
};
pub use stats::{item_stars, sheet_complete, total_points};
pub use study::{end_session, next_item, start_session, submit_answer, SessionInfo};

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CommandError {
    pub message: String,
}

impl CommandError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<crate::db::DbError> for CommandError {
    fn from(e: crate::db::DbError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<drill_core::DrillError> for CommandError {
    fn from(e: drill_core::DrillError) -> Self {
        Self { message: e.to_string() }
    }
}

impl From<drill_core::ValidationError> for CommandError {
    fn from(e: drill_core::ValidationError) -> Self {
        Self { message: e.to_string() }
    }
}

impl<T> From<PoisonError<T>> for CommandError {
    fn from(_: PoisonError<T>) -> Self {
        Self::new("application state is unavailable after a previous failure")
    }
}
