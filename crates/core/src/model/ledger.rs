use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::QuizId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LedgerError {
    #[error("ledger has no entry for quiz {quiz_id}")]
    UnknownQuiz { quiz_id: QuizId },

    #[error("quiz {quiz_id} already has a recorded result")]
    AlreadyAnswered { quiz_id: QuizId },

    #[error("duplicate ledger entry for quiz {quiz_id}")]
    DuplicateQuiz { quiz_id: QuizId },
}

/// Answer record for one quiz item within a session.
///
/// `result` is `None` until the item is answered; once set it is terminal
/// for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    quiz_id: QuizId,
    result: Option<bool>,
}

impl LedgerEntry {
    /// Creates an unanswered entry for the given quiz item.
    #[must_use]
    pub fn unanswered(quiz_id: QuizId) -> Self {
        Self {
            quiz_id,
            result: None,
        }
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn result(&self) -> Option<bool> {
        self.result
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.result.is_some()
    }
}

/// Aggregate counts over a ledger.
///
/// Unanswered entries count toward `total` but never toward `correct`, so a
/// ledger summarized mid-session under-reports correctness rather than
/// failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSummary {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
}

/// The per-session answer ledger: one entry per quiz item in the category,
/// in an order fixed at creation and stable thereafter.
///
/// Serializes as a plain entry list (the shape the session store persists);
/// deserialization re-validates that no quiz id appears twice.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<LedgerEntry>", into = "Vec<LedgerEntry>")]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    /// Builds a ledger from pre-ordered entries.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::DuplicateQuiz` if two entries share a quiz id.
    pub fn from_entries(entries: Vec<LedgerEntry>) -> Result<Self, LedgerError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.quiz_id()) {
                return Err(LedgerError::DuplicateQuiz {
                    quiz_id: entry.quiz_id(),
                });
            }
        }
        Ok(Self { entries })
    }

    /// First entry in fixed order that has not been answered yet.
    ///
    /// Stable: repeated calls without an intervening `record_result` return
    /// the same entry.
    #[must_use]
    pub fn next_unanswered(&self) -> Option<&LedgerEntry> {
        self.entries.iter().find(|entry| !entry.is_answered())
    }

    /// Records the outcome for one quiz item.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnknownQuiz` when no entry matches `quiz_id`
    /// (the ledger and catalog have diverged) and
    /// `LedgerError::AlreadyAnswered` when the entry is already terminal.
    pub fn record_result(&mut self, quiz_id: QuizId, outcome: bool) -> Result<(), LedgerError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.quiz_id == quiz_id)
            .ok_or(LedgerError::UnknownQuiz { quiz_id })?;

        if entry.result.is_some() {
            return Err(LedgerError::AlreadyAnswered { quiz_id });
        }

        entry.result = Some(outcome);
        Ok(())
    }

    /// Aggregate counts for the result screen.
    #[must_use]
    pub fn summary(&self) -> LedgerSummary {
        let answered = self.entries.iter().filter(|e| e.is_answered()).count();
        let correct = self
            .entries
            .iter()
            .filter(|e| e.result() == Some(true))
            .count();
        LedgerSummary {
            total: self.entries.len(),
            answered,
            correct,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next_unanswered().is_none()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }
}

impl TryFrom<Vec<LedgerEntry>> for Ledger {
    type Error = LedgerError;

    fn try_from(entries: Vec<LedgerEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<Ledger> for Vec<LedgerEntry> {
    fn from(ledger: Ledger) -> Self {
        ledger.entries
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(ids: &[u64]) -> Ledger {
        Ledger::from_entries(
            ids.iter()
                .map(|id| LedgerEntry::unanswered(QuizId::new(*id)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn from_entries_rejects_duplicates() {
        let err = Ledger::from_entries(vec![
            LedgerEntry::unanswered(QuizId::new(1)),
            LedgerEntry::unanswered(QuizId::new(1)),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            LedgerError::DuplicateQuiz {
                quiz_id: QuizId::new(1)
            }
        );
    }

    #[test]
    fn next_unanswered_returns_first_open_entry() {
        let mut ledger = ledger(&[1, 2, 3]);
        ledger.record_result(QuizId::new(3), true).unwrap();

        let next = ledger.next_unanswered().unwrap();
        assert_eq!(next.quiz_id(), QuizId::new(1));

        // Stable without intervening mutation.
        assert_eq!(ledger.next_unanswered().unwrap().quiz_id(), QuizId::new(1));
    }

    #[test]
    fn next_unanswered_skips_answered_prefix() {
        let mut ledger = ledger(&[1, 2, 3]);
        ledger.record_result(QuizId::new(1), false).unwrap();
        assert_eq!(ledger.next_unanswered().unwrap().quiz_id(), QuizId::new(2));
    }

    #[test]
    fn record_result_unknown_quiz_errors() {
        let mut ledger = ledger(&[1, 2]);
        let err = ledger.record_result(QuizId::new(9), true).unwrap_err();
        assert_eq!(
            err,
            LedgerError::UnknownQuiz {
                quiz_id: QuizId::new(9)
            }
        );
    }

    #[test]
    fn record_result_rejects_second_answer() {
        let mut ledger = ledger(&[1]);
        ledger.record_result(QuizId::new(1), false).unwrap();

        let err = ledger.record_result(QuizId::new(1), true).unwrap_err();
        assert_eq!(
            err,
            LedgerError::AlreadyAnswered {
                quiz_id: QuizId::new(1)
            }
        );
        // The first outcome stands.
        assert_eq!(ledger.entries()[0].result(), Some(false));
    }

    #[test]
    fn summary_counts_correct_and_leaves_open_entries_in_total() {
        let mut ledger = ledger(&[1, 2, 3]);
        ledger.record_result(QuizId::new(1), true).unwrap();
        ledger.record_result(QuizId::new(2), false).unwrap();

        let summary = ledger.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.answered, 2);
        assert_eq!(summary.correct, 1);
        assert!(!ledger.is_complete());
    }

    #[test]
    fn empty_ledger_is_complete_with_zero_counts() {
        let ledger = Ledger::default();
        assert!(ledger.is_empty());
        assert!(ledger.is_complete());
        assert_eq!(
            ledger.summary(),
            LedgerSummary {
                total: 0,
                answered: 0,
                correct: 0
            }
        );
    }

    #[test]
    fn serde_roundtrip_preserves_order_and_results() {
        let mut ledger = ledger(&[5, 3, 8]);
        ledger.record_result(QuizId::new(3), true).unwrap();

        let json = serde_json::to_string(&ledger).unwrap();
        let back: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }

    #[test]
    fn serde_rejects_duplicate_entries() {
        let json = r#"[{"quiz_id":1,"result":null},{"quiz_id":1,"result":true}]"#;
        let result: Result<Ledger, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
