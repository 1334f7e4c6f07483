//! A quiz session over one sheet.
//!
//! The session owns the per-session context: the recent window and the
//! presentation currently on screen, including whether the user already got
//! their one "check your spelling" retry. Proficiency states are only touched
//! when an answer is scored, so abandoning a session needs no cleanup.

use crate::algorithm::{advance, sweep};
use crate::error::{DrillError, Result};
use crate::matching::{classify, MatchKind};
use crate::selector::{self, RecentWindow};
use crate::store::Store;
use crate::types::{ItemId, ProficiencyState, SheetId, Standing};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The item currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub item_id: ItemId,
    pub question: String,
    pub state: ProficiencyState,
    /// Set once a near miss was answered with a spelling prompt.
    pub retried: bool,
    pub answered: bool,
}

/// Outcome of submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Feedback {
    Correct { standing: Standing },
    Wrong { displayed: String, standing: Standing },
    /// Near miss; nothing was scored and the user may try once more.
    CheckSpelling,
}

#[derive(Debug, Clone)]
pub struct Session {
    sheet: SheetId,
    allow_fuzzy: bool,
    recent: RecentWindow,
    current: Option<Presentation>,
}

impl Session {
    /// Start drilling `sheet`. Runs the decay sweep before anything is selected.
    pub fn start<S: Store + ?Sized>(
        store: &mut S,
        sheet: SheetId,
        now: DateTime<Utc>,
        allow_fuzzy: bool,
    ) -> Result<Self> {
        let promoted = sweep(store, now)?;
        let items = store.items_in_sheet(sheet)?;
        if items.is_empty() {
            return Err(DrillError::EmptySheet(sheet));
        }

        tracing::info!(%sheet, items = items.len(), promoted, "session started");
        Ok(Self {
            sheet,
            allow_fuzzy,
            recent: RecentWindow::new(),
            current: None,
        })
    }

    pub fn sheet(&self) -> SheetId {
        self.sheet
    }

    pub fn recent(&self) -> &RecentWindow {
        &self.recent
    }

    pub fn current(&self) -> Option<&Presentation> {
        self.current.as_ref()
    }

    /// Move on to the next item. The item shown so far joins the recent window.
    pub fn next_item<S, R>(&mut self, store: &S, rng: &mut R) -> Result<&Presentation>
    where
        S: Store + ?Sized,
        R: Rng + ?Sized,
    {
        if let Some(previous) = self.current.take() {
            self.recent.push(previous.item_id);
        }

        let item_id = selector::next_item(store, self.sheet, &self.recent, rng)?;
        let item = store.item(item_id)?;
        let state = store.get_state(item_id)?;

        Ok(&*self.current.insert(Presentation {
            item_id,
            question: item.question,
            state,
            retried: false,
            answered: false,
        }))
    }

    /// Score an answer for the open presentation.
    pub fn submit_answer<S: Store + ?Sized>(
        &mut self,
        store: &mut S,
        answer: &str,
        now: DateTime<Utc>,
    ) -> Result<Feedback> {
        let presentation = self
            .current
            .as_mut()
            .filter(|p| !p.answered)
            .ok_or(DrillError::NothingPresented)?;
        let item_id = presentation.item_id;

        let accepted = store.accepted_answers(item_id)?;
        let allow_fuzzy = self.allow_fuzzy && !presentation.retried;
        let kind = classify(answer, &accepted, allow_fuzzy);
        if kind == MatchKind::Fuzzy {
            presentation.retried = true;
            return Ok(Feedback::CheckSpelling);
        }

        let matched = kind == MatchKind::Exact;
        let state = store.get_state(item_id)?;
        let next = advance(&state, matched, now);
        store.put_state(item_id, &next)?;

        presentation.state = next;
        presentation.answered = true;
        tracing::debug!(%item_id, matched, "answer scored");

        let standing = next.standing();
        Ok(if matched {
            Feedback::Correct { standing }
        } else {
            Feedback::Wrong {
                displayed: accepted.into_iter().next().unwrap_or_default(),
                standing,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::NewItem;
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Items as `(question, "answer|answer")` pairs, all in one sheet.
    fn store_with(questions: &[(&str, &str)]) -> (MemoryStore, SheetId) {
        let mut store = MemoryStore::new();
        for (question, answers) in questions {
            store
                .add_item(NewItem {
                    question: question.to_string(),
                    answers: answers.split('|').map(String::from).collect(),
                    sheets: vec!["georgian".into()],
                })
                .unwrap();
        }
        let sheet = store.find_sheet("georgian").unwrap();
        (store, sheet)
    }

    #[test]
    fn exact_answer_is_scored() {
        let (mut store, sheet) = store_with(&[("kargi", "good")]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::start(&mut store, sheet, Utc::now(), true).unwrap();

        let item_id = session.next_item(&store, &mut rng).unwrap().item_id;
        let feedback = session.submit_answer(&mut store, " good ", Utc::now()).unwrap();

        assert_eq!(
            feedback,
            Feedback::Correct {
                standing: Standing {
                    points: 0,
                    needed: 2,
                    so_far: 1
                }
            }
        );
        assert_eq!(store.get_state(item_id).unwrap().so_far, 1);
    }

    #[test]
    fn wrong_answer_shows_displayed_answer() {
        let (mut store, sheet) = store_with(&[("kargi", "good|fine")]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::start(&mut store, sheet, Utc::now(), true).unwrap();

        session.next_item(&store, &mut rng).unwrap();
        let feedback = session.submit_answer(&mut store, "bad", Utc::now()).unwrap();

        assert_eq!(
            feedback,
            Feedback::Wrong {
                displayed: "good".into(),
                standing: Standing {
                    points: 0,
                    needed: 3,
                    so_far: -3
                }
            }
        );
    }

    #[test]
    fn near_miss_gets_exactly_one_retry() {
        let (mut store, sheet) = store_with(&[("kargad", "kargad")]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::start(&mut store, sheet, Utc::now(), true).unwrap();

        let item_id = session.next_item(&store, &mut rng).unwrap().item_id;
        let first = session.submit_answer(&mut store, "kargda", Utc::now()).unwrap();
        assert_eq!(first, Feedback::CheckSpelling);
        assert_eq!(store.get_state(item_id).unwrap(), ProficiencyState::default());

        let second = session.submit_answer(&mut store, "kargda", Utc::now()).unwrap();
        assert!(matches!(second, Feedback::Wrong { .. }));
    }

    #[test]
    fn retry_can_still_be_correct() {
        let (mut store, sheet) = store_with(&[("kargad", "kargad")]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::start(&mut store, sheet, Utc::now(), true).unwrap();

        session.next_item(&store, &mut rng).unwrap();
        session.submit_answer(&mut store, "kargda", Utc::now()).unwrap();
        let second = session.submit_answer(&mut store, "kargad", Utc::now()).unwrap();
        assert!(matches!(second, Feedback::Correct { .. }));
    }

    #[test]
    fn fuzzy_disabled_scores_near_miss_as_wrong() {
        let (mut store, sheet) = store_with(&[("kargad", "kargad")]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::start(&mut store, sheet, Utc::now(), false).unwrap();

        session.next_item(&store, &mut rng).unwrap();
        let feedback = session.submit_answer(&mut store, "kargda", Utc::now()).unwrap();
        assert!(matches!(feedback, Feedback::Wrong { .. }));
    }

    #[test]
    fn answering_twice_is_rejected() {
        let (mut store, sheet) = store_with(&[("kargi", "good")]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = Session::start(&mut store, sheet, Utc::now(), true).unwrap();

        assert!(matches!(
            session.submit_answer(&mut store, "good", Utc::now()),
            Err(DrillError::NothingPresented)
        ));

        session.next_item(&store, &mut rng).unwrap();
        session.submit_answer(&mut store, "good", Utc::now()).unwrap();
        assert!(matches!(
            session.submit_answer(&mut store, "good", Utc::now()),
            Err(DrillError::NothingPresented)
        ));
    }

    #[test]
    fn shown_items_join_recent_window() {
        let (mut store, sheet) = store_with(&[
            ("a", "1"),
            ("b", "2"),
            ("c", "3"),
            ("d", "4"),
        ]);
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = Session::start(&mut store, sheet, Utc::now(), true).unwrap();

        let mut shown = Vec::new();
        for _ in 0..4 {
            shown.push(session.next_item(&store, &mut rng).unwrap().item_id);
        }
        shown.sort();
        shown.dedup();
        assert_eq!(shown.len(), 4);
        assert_eq!(session.recent().len(), 3);
    }

    #[test]
    fn start_runs_decay_sweep() {
        let (mut store, sheet) = store_with(&[("kargi", "good")]);
        let (item_id, _) = store.items_in_sheet(sheet).unwrap()[0];
        let now = Utc::now();
        store
            .put_state(
                item_id,
                &ProficiencyState {
                    points: 0,
                    needed: 2,
                    so_far: 2,
                    completed_at: Some(now - Duration::days(2)),
                },
            )
            .unwrap();

        Session::start(&mut store, sheet, now, true).unwrap();
        let state = store.get_state(item_id).unwrap();
        assert_eq!(state.points, 1);
        assert_eq!(state.so_far, 0);
        assert_eq!(state.completed_at, None);
    }

    #[test]
    fn unknown_sheet_cannot_start() {
        let (mut store, _) = store_with(&[("kargi", "good")]);
        assert!(matches!(
            Session::start(&mut store, SheetId(99), Utc::now(), true),
            Err(DrillError::UnknownSheet(SheetId(99)))
        ));
    }

    #[test]
    fn empty_sheet_cannot_start() {
        let mut store = MemoryStore::new();
        let sheet = store.add_sheet("empty").unwrap();
        assert!(matches!(
            Session::start(&mut store, sheet, Utc::now(), true),
            Err(DrillError::EmptySheet(_))
        ));
    }
}
