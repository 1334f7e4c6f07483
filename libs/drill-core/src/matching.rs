//! Answer matching for typed answers.

use serde::{Deserialize, Serialize};

/// Similarity at or above which a miss is treated as a spelling slip.
pub const FUZZY_THRESHOLD: f64 = 0.9;

/// Classification of a submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Equal to one of the accepted answers.
    Exact,
    /// Close to an accepted answer; the user gets one more try.
    Fuzzy,
    Miss,
}

/// Classify `submitted` against the accepted answers.
///
/// Only surrounding whitespace of the submission is ignored; case and inner
/// spacing count. `Fuzzy` is only reported when `allow_fuzzy` is set.
pub fn classify<S: AsRef<str>>(submitted: &str, accepted: &[S], allow_fuzzy: bool) -> MatchKind {
    let submitted = submitted.trim();

    if accepted.iter().any(|a| a.as_ref() == submitted) {
        return MatchKind::Exact;
    }

    if allow_fuzzy
        && accepted
            .iter()
            .any(|a| similarity(submitted, a.as_ref()) >= FUZZY_THRESHOLD)
    {
        return MatchKind::Fuzzy;
    }

    MatchKind::Miss
}

/// Jaro-Winkler similarity (0.0 to 1.0) over characters.
pub fn similarity(a: &str, b: &str) -> f64 {
    let jaro = jaro(a, b);
    let prefix = a
        .chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .take(4)
        .count();

    jaro + prefix as f64 * 0.1 * (1.0 - jaro)
}

/// Jaro similarity (0.0 to 1.0) over characters.
pub fn jaro(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() && b_chars.is_empty() {
        return 1.0;
    }
    if a_chars.is_empty() || b_chars.is_empty() {
        return 0.0;
    }

    let window = (a_chars.len().max(b_chars.len()) / 2).saturating_sub(1);
    let mut a_matched = vec![false; a_chars.len()];
    let mut b_matched = vec![false; b_chars.len()];
    let mut matches = 0usize;

    for (i, ca) in a_chars.iter().enumerate() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(b_chars.len());
        for j in start..end {
            if !b_matched[j] && b_chars[j] == *ca {
                a_matched[i] = true;
                b_matched[j] = true;
                matches += 1;
                break;
            }
        }
    }

    if matches == 0 {
        return 0.0;
    }

    // Matched characters that appear in a different order.
    let mut out_of_order = 0usize;
    let mut k = 0;
    for (i, ca) in a_chars.iter().enumerate() {
        if !a_matched[i] {
            continue;
        }
        while !b_matched[k] {
            k += 1;
        }
        if *ca != b_chars[k] {
            out_of_order += 1;
        }
        k += 1;
    }

    let m = matches as f64;
    let transpositions = out_of_order as f64 / 2.0;
    (m / a_chars.len() as f64 + m / b_chars.len() as f64 + (m - transpositions) / m) / 3.0
}
