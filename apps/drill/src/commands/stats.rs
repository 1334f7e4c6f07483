//! Progress commands.

use crate::db::StatsRepository;
use crate::state::AppState;
use drill_core::{ItemId, SheetId, Store};

use super::CommandError;

/// Sum over all items of points, plus one per item at `so_far == 2`.
pub fn total_points(state: &AppState) -> Result<u64, CommandError> {
    let repo = state.repository()?;
    repo.total_points().map_err(Into::into)
}

pub fn sheet_complete(sheet_id: i64, state: &AppState) -> Result<bool, CommandError> {
    let repo = state.repository()?;
    repo.sheet_complete(SheetId(sheet_id)).map_err(Into::into)
}

pub fn item_stars(item_id: i64, state: &AppState) -> Result<u32, CommandError> {
    let repo = state.repository()?;
    Ok(repo.get_state(ItemId(item_id))?.stars())
}
