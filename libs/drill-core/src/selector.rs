//! Choice of the next item to present from a sheet.
//!
//! Candidates are ranked by `(recency, bucket)` and the winner is drawn
//! uniformly among the lowest-ranked ones:
//!
//! - recency: items outside the recent window come first; inside it the
//!   least recently seen item comes first.
//! - bucket: items mid-climb or mid-penalty come first, then fresh items
//!   (`so_far == 0`), then mastered ones (`so_far == 2`).

use crate::error::{DrillError, Result};
use crate::store::Store;
use crate::types::{ItemId, ProficiencyState, SheetId, MIN_NEEDED};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Number of recently presented items kept out of rotation.
pub const RECENT_CAPACITY: usize = 3;

/// Sliding window of the most recently presented items, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentWindow {
    items: VecDeque<ItemId>,
}

impl RecentWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a presentation, evicting the oldest entry on overflow.
    pub fn push(&mut self, item: ItemId) {
        if self.items.len() == RECENT_CAPACITY {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    /// 0 for items outside the window, otherwise 1 for the oldest entry up to
    /// the window length for the newest.
    ///
    /// An item that appears twice ranks by its newest appearance.
    pub fn rank(&self, item: ItemId) -> usize {
        self.items
            .iter()
            .rposition(|id| *id == item)
            .map_or(0, |pos| pos + 1)
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().copied()
    }
}

/// Proficiency bucket used as the secondary ordering key.
fn bucket(state: &ProficiencyState) -> u8 {
    match state.so_far {
        MIN_NEEDED => 2,
        0 => 1,
        _ => 0,
    }
}

/// Pick the next item among `candidates`, or `None` if there are none.
pub fn choose<R: Rng + ?Sized>(
    candidates: &[(ItemId, ProficiencyState)],
    recent: &RecentWindow,
    rng: &mut R,
) -> Option<ItemId> {
    let key = |(id, state): &(ItemId, ProficiencyState)| (recent.rank(*id), bucket(state));

    let best = candidates.iter().map(|candidate| key(candidate)).min()?;
    let tied: Vec<ItemId> = candidates
        .iter()
        .filter(|candidate| key(*candidate) == best)
        .map(|(id, _)| *id)
        .collect();

    tied.choose(rng).copied()
}

/// Pick the next item of `sheet` from the store.
pub fn next_item<S, R>(store: &S, sheet: SheetId, recent: &RecentWindow, rng: &mut R) -> Result<ItemId>
where
    S: Store + ?Sized,
    R: Rng + ?Sized,
{
    let candidates = store.items_in_sheet(sheet)?;
    let chosen = choose(&candidates, recent, rng).ok_or(DrillError::EmptySheet(sheet))?;
    tracing::debug!(%sheet, item = %chosen, candidates = candidates.len(), "selected item");
    Ok(chosen)
}
