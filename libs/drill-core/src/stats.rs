//! Read-side progress aggregates.

use crate::types::{ProficiencyState, MIN_NEEDED};

/// Total points: every item's points, plus one per item currently at `so_far == 2`.
pub fn total_points<'a, I>(states: I) -> u64
where
    I: IntoIterator<Item = &'a ProficiencyState>,
{
    states
        .into_iter()
        .map(|state| u64::from(state.points) + u64::from(state.so_far == MIN_NEEDED))
        .sum()
}

/// Whether nothing more can be earned right now: every item sits at `so_far == 2`.
pub fn sheet_complete<'a, I>(states: I) -> bool
where
    I: IntoIterator<Item = &'a ProficiencyState>,
{
    states.into_iter().all(|state| state.so_far == MIN_NEEDED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state(points: u32, so_far: i32) -> ProficiencyState {
        ProficiencyState {
            points,
            needed: 4,
            so_far,
            completed_at: None,
        }
    }

    #[test]
    fn total_points_sums_points_and_mastery() {
        let states = [state(0, 0), state(1, 2), state(3, -4), state(2, 2), state(4, 1)];
        // 0 + (1 + 1) + 3 + (2 + 1) + 4
        assert_eq!(total_points(&states), 12);
    }

    #[test]
    fn total_points_of_nothing_is_zero() {
        assert_eq!(total_points(&Vec::<ProficiencyState>::new()), 0);
    }

    #[test]
    fn sheet_complete_requires_every_item() {
        assert!(sheet_complete(&[state(0, 2), state(3, 2)]));
        assert!(!sheet_complete(&[state(0, 2), state(3, 1)]));
    }
}
