//! Per-answer progression of a proficiency state.
//!
//! A miss makes the cycle one step longer (up to [`MAX_NEEDED`]) and puts the
//! item at the bottom of a full penalty streak. A hit climbs one step; landing
//! on zero snaps straight to full credit. A hit on an already completed cycle
//! shortens the cycle by one, down to [`MIN_NEEDED`].

use crate::types::{ProficiencyState, MAX_NEEDED, MIN_NEEDED};
use chrono::{DateTime, Utc};

/// Compute the state that follows an answer.
///
/// `matched` is true only for an exact match. `now` stamps `completed_at` the
/// first time the item reaches the easiest mastered cycle.
pub fn advance(state: &ProficiencyState, matched: bool, now: DateTime<Utc>) -> ProficiencyState {
    let mut next = *state;

    if !matched {
        next.needed = (next.needed + 1).min(MAX_NEEDED);
        next.so_far = -next.needed;
        next.completed_at = None;
    } else {
        if next.so_far < next.needed {
            next.so_far += 1;
            if next.so_far == 0 {
                next.so_far = next.needed;
            }
        } else if next.needed > MIN_NEEDED {
            next.needed -= 1;
            next.so_far -= 1;
        }

        // Repeated passes keep the original stamp.
        if next.is_mastered() && next.completed_at.is_none() {
            next.completed_at = Some(now);
        }
    }

    tracing::debug!(
        matched,
        needed = next.needed,
        so_far = next.so_far,
        "advanced proficiency"
    );
    next
}
