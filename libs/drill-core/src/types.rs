//! Core types for the vocabulary drill.

use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Easiest mastery cycle. A state sitting at `needed == so_far == MIN_NEEDED`
/// is fully mastered for now.
pub const MIN_NEEDED: i32 = 2;

/// Hardest mastery cycle.
pub const MAX_NEEDED: i32 = 10;

/// Maximum length of questions, answers and sheet names.
pub const MAX_TEXT_LEN: usize = 80;

/// Maximum length of language names.
pub const MAX_LANGUAGE_LEN: usize = 40;

/// Stable identifier of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetId(pub i64);

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-item mastery counters.
///
/// `needed` is the length of the current mastery cycle, `so_far` the progress
/// within it. Negative `so_far` is a penalty streak left by a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProficiencyState {
    pub points: u32,
    pub needed: i32,
    pub so_far: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Default for ProficiencyState {
    fn default() -> Self {
        Self {
            points: 0,
            needed: MIN_NEEDED,
            so_far: 0,
            completed_at: None,
        }
    }
}

impl ProficiencyState {
    /// Whether the item sits at the easiest fully-mastered cycle.
    pub fn is_mastered(&self) -> bool {
        self.needed == MIN_NEEDED && self.so_far == MIN_NEEDED
    }

    /// Stars shown for this item: earned points plus one for current mastery.
    pub fn stars(&self) -> u32 {
        self.points + u32::from(self.so_far == MIN_NEEDED)
    }

    pub fn standing(&self) -> Standing {
        Standing {
            points: self.points,
            needed: self.needed,
            so_far: self.so_far,
        }
    }
}

/// The `(points, needed, so_far)` triple reported back after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub points: u32,
    pub needed: i32,
    pub so_far: i32,
}

/// A question with its accepted answers. The first answer is the displayed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub question: String,
    pub answers: Vec<String>,
}

impl Item {
    /// Canonical answer shown to the user after a miss.
    pub fn displayed_answer(&self) -> &str {
        self.answers.first().map(String::as_str).unwrap_or_default()
    }
}

/// Input for creating or editing an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewItem {
    pub question: String,
    /// Accepted answers; the first becomes the displayed one.
    pub answers: Vec<String>,
    /// Names of the sheets the item belongs to.
    #[serde(default)]
    pub sheets: Vec<String>,
}

impl NewItem {
    /// Trim every field and check the data-model constraints.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        let question = validate_text("question", &self.question, MAX_TEXT_LEN)?;
        if self.answers.is_empty() {
            return Err(ValidationError::NoAnswers);
        }

        let mut seen = HashSet::new();
        let mut answers = Vec::with_capacity(self.answers.len());
        for answer in &self.answers {
            let answer = validate_text("answer", answer, MAX_TEXT_LEN)?;
            if !seen.insert(answer.clone()) {
                return Err(ValidationError::DuplicateAnswer(answer));
            }
            answers.push(answer);
        }

        let sheets = self
            .sheets
            .iter()
            .map(|s| validate_text("sheet name", s, MAX_TEXT_LEN))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            question,
            answers,
            sheets,
        })
    }
}

/// Trim `value` and check that it holds between 1 and `max` characters.
pub fn validate_text(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > max {
        return Err(ValidationError::Length { field, max, len });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_state_defaults() {
        let state = ProficiencyState::default();
        assert_eq!(state.points, 0);
        assert_eq!(state.needed, 2);
        assert_eq!(state.so_far, 0);
        assert_eq!(state.completed_at, None);
        assert!(!state.is_mastered());
    }

    #[test]
    fn stars_count_current_mastery() {
        let state = ProficiencyState {
            points: 3,
            needed: 2,
            so_far: 2,
            completed_at: None,
        };
        assert_eq!(state.stars(), 4);
        assert_eq!(ProficiencyState { so_far: 1, ..state }.stars(), 3);
    }

    #[test]
    fn new_item_is_trimmed() {
        let item = NewItem {
            question: "  gamarjoba ".into(),
            answers: vec!["hello ".into(), " hi".into()],
            sheets: vec![" greetings".into()],
        };
        let item = item.normalized().unwrap();
        assert_eq!(item.question, "gamarjoba");
        assert_eq!(item.answers, vec!["hello", "hi"]);
        assert_eq!(item.sheets, vec!["greetings"]);
    }

    #[test]
    fn new_item_rejects_bad_input() {
        let empty = NewItem {
            question: "   ".into(),
            answers: vec!["a".into()],
            sheets: vec![],
        };
        assert!(matches!(
            empty.normalized(),
            Err(ValidationError::Length { field: "question", len: 0, .. })
        ));

        let no_answers = NewItem {
            question: "q".into(),
            ..Default::default()
        };
        assert_eq!(no_answers.normalized().unwrap_err(), ValidationError::NoAnswers);

        let duplicate = NewItem {
            question: "q".into(),
            answers: vec!["a".into(), " a".into()],
            sheets: vec![],
        };
        assert_eq!(
            duplicate.normalized().unwrap_err(),
            ValidationError::DuplicateAnswer("a".into())
        );

        let long = NewItem {
            question: "x".repeat(81),
            answers: vec!["a".into()],
            sheets: vec![],
        };
        assert!(long.normalized().is_err());
    }

    #[test]
    fn displayed_answer_is_first() {
        let item = Item {
            id: ItemId(1),
            question: "kargad".into(),
            answers: vec!["well".into(), "good".into()],
        };
        assert_eq!(item.displayed_answer(), "well");
    }
}
