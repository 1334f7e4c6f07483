//! Staleness-driven promotion of mastered items.
//!
//! An item that stays mastered long enough earns a point and has to earn its
//! mastery again. The wait grows with the points already held:
//!
//! | points | wait     |
//! |--------|----------|
//! | 0      | 1 day    |
//! | 1      | 7 days   |
//! | 2      | 1 month  |
//! | 3      | 3 months |
//!
//! Items holding [`MAX_DECAY_POINTS`] or more are retired from decay.

use crate::error::Result;
use crate::store::Store;
use crate::types::ProficiencyState;
use chrono::{DateTime, Duration, Months, Utc};

/// Points at which an item no longer decays.
pub const MAX_DECAY_POINTS: u32 = 4;

/// Instant at which an item completed at `completed_at` holding `points` becomes stale.
pub fn stale_at(points: u32, completed_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match points {
        0 => completed_at.checked_add_signed(Duration::days(1)),
        1 => completed_at.checked_add_signed(Duration::days(7)),
        2 => completed_at.checked_add_months(Months::new(1)),
        3 => completed_at.checked_add_months(Months::new(3)),
        _ => None,
    }
}

/// The promoted state if `state` has gone stale by `now`.
///
/// Only `points`, `so_far` and `completed_at` change; `needed` is kept.
pub fn decay(state: &ProficiencyState, now: DateTime<Utc>) -> Option<ProficiencyState> {
    let completed_at = state.completed_at?;
    let due = stale_at(state.points, completed_at)?;
    if now < due {
        return None;
    }

    Some(ProficiencyState {
        points: state.points + 1,
        so_far: 0,
        completed_at: None,
        ..*state
    })
}

/// Promote every stale item in the store. Returns how many were promoted.
///
/// All promotions are written in a single [`Store::put_states`] call.
pub fn sweep<S: Store + ?Sized>(store: &mut S, now: DateTime<Utc>) -> Result<usize> {
    let promoted: Vec<_> = store
        .all_items_with_state()?
        .into_iter()
        .filter_map(|(item_id, state)| {
            let next = decay(&state, now)?;
            tracing::debug!(%item_id, points = next.points, "item decayed");
            Some((item_id, next))
        })
        .collect();

    if !promoted.is_empty() {
        store.put_states(&promoted)?;
    }
    Ok(promoted.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{ItemId, NewItem};
    use pretty_assertions::assert_eq;

    fn mastered(points: u32, completed_at: DateTime<Utc>) -> ProficiencyState {
        ProficiencyState {
            points,
            needed: 2,
            so_far: 2,
            completed_at: Some(completed_at),
        }
    }

    #[test]
    fn stale_item_is_promoted() {
        let now = Utc::now();
        let state = mastered(1, now - Duration::days(8));
        let next = decay(&state, now).unwrap();
        assert_eq!(
            next,
            ProficiencyState {
                points: 2,
                needed: 2,
                so_far: 0,
                completed_at: None,
            }
        );
    }

    #[test]
    fn fresh_item_is_unchanged() {
        let now = Utc::now();
        assert_eq!(decay(&mastered(1, now - Duration::days(3)), now), None);
    }

    #[test]
    fn threshold_is_inclusive() {
        let now = Utc::now();
        assert!(decay(&mastered(0, now - Duration::days(1)), now).is_some());
        assert!(decay(&mastered(0, now - Duration::hours(23)), now).is_none());
    }

    #[test]
    fn thresholds_follow_points() {
        let completed = DateTime::parse_from_rfc3339("2024-01-31T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let at = |s: &str| {
            DateTime::parse_from_rfc3339(s)
                .unwrap()
                .with_timezone(&Utc)
        };
        assert_eq!(stale_at(0, completed), Some(at("2024-02-01T12:00:00Z")));
        assert_eq!(stale_at(1, completed), Some(at("2024-02-07T12:00:00Z")));
        assert_eq!(stale_at(2, completed), Some(at("2024-02-29T12:00:00Z")));
        assert_eq!(stale_at(3, completed), Some(at("2024-04-30T12:00:00Z")));
        assert_eq!(stale_at(4, completed), None);
    }

    #[test]
    fn retired_items_never_decay() {
        let now = Utc::now();
        assert_eq!(decay(&mastered(4, now - Duration::days(3650)), now), None);
    }

    #[test]
    fn needed_is_left_alone() {
        let now = Utc::now();
        let state = ProficiencyState {
            needed: 5,
            ..mastered(0, now - Duration::days(2))
        };
        assert_eq!(decay(&state, now).unwrap().needed, 5);
    }

    #[test]
    fn unstamped_items_are_skipped() {
        let state = ProficiencyState {
            points: 0,
            needed: 2,
            so_far: 2,
            completed_at: None,
        };
        assert_eq!(decay(&state, Utc::now()), None);
    }

    #[test]
    fn sweep_updates_store() {
        let now = Utc::now();
        let mut store = MemoryStore::new();
        let stale = store
            .add_item(NewItem {
                question: "kargad".into(),
                answers: vec!["well".into()],
                sheets: vec![],
            })
            .unwrap();
        let fresh = store
            .add_item(NewItem {
                question: "tsudad".into(),
                answers: vec!["badly".into()],
                sheets: vec![],
            })
            .unwrap();
        store
            .put_state(stale, &mastered(1, now - Duration::days(8)))
            .unwrap();
        store
            .put_state(fresh, &mastered(1, now - Duration::days(3)))
            .unwrap();

        assert_eq!(sweep(&mut store, now).unwrap(), 1);
        assert_eq!(store.get_state(stale).unwrap().points, 2);
        assert_eq!(store.get_state(stale).unwrap().so_far, 0);
        assert_eq!(store.get_state(fresh).unwrap(), mastered(1, now - Duration::days(3)));
        assert!(store.get_state(ItemId(99)).is_err());
    }
}
