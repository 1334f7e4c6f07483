//! Core vocabulary drill engine.
//!
//! Provides:
//! - Proficiency progression and decay policy
//! - Next-item selection over a sheet
//! - Answer matching with one-time spelling leniency (Jaro-Winkler)
//! - The `Store` contract and an in-memory implementation
//! - Quiz sessions exposing `next_item` / `submit_answer`

pub mod algorithm;
pub mod error;
pub mod matching;
pub mod selector;
pub mod session;
pub mod stats;
pub mod store;
pub mod types;

pub use algorithm::{advance, decay, sweep};
pub use error::{DrillError, Result, ValidationError};
pub use matching::{classify, similarity, MatchKind, FUZZY_THRESHOLD};
pub use selector::{RecentWindow, RECENT_CAPACITY};
pub use session::{Feedback, Presentation, Session};
pub use stats::{sheet_complete, total_points};
pub use store::{MemoryStore, Store};
pub use types::{
    validate_text, Item, ItemId, NewItem, ProficiencyState, SheetId, Standing, MAX_LANGUAGE_LEN,
    MAX_NEEDED, MAX_TEXT_LEN, MIN_NEEDED,
};
