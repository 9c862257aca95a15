use std::collections::HashSet;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{CategoryId, OptionId, QuizId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OptionError {
    #[error("option label cannot be empty")]
    EmptyLabel,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("quiz item needs at least one option")]
    NoOptions,

    #[error("quiz item needs at least one correct option")]
    NoCorrectOption,

    #[error("duplicate option {option_id} in quiz item")]
    DuplicateOption { option_id: OptionId },
}

//
// ─── ANSWER OPTION ─────────────────────────────────────────────────────────────
//

/// One selectable answer for a quiz item, flagged correct or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    id: OptionId,
    label: String,
    is_correct: bool,
}

impl AnswerOption {
    /// Creates a new option.
    ///
    /// # Errors
    ///
    /// Returns `OptionError::EmptyLabel` if the label is empty or
    /// whitespace-only.
    pub fn new(id: OptionId, label: impl Into<String>, is_correct: bool) -> Result<Self, OptionError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(OptionError::EmptyLabel);
        }

        Ok(Self {
            id,
            label: label.trim().to_owned(),
            is_correct,
        })
    }

    #[must_use]
    pub fn id(&self) -> OptionId {
        self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }
}

//
// ─── QUIZ ITEM ─────────────────────────────────────────────────────────────────
//

/// One question with its answer options.
///
/// Single- and multi-select items share the same shape: correctness is
/// decided by comparing the selection against every option flagged correct.
/// Catalog data, never mutated by the play flow.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizItem {
    id: QuizId,
    category_id: CategoryId,
    question: String,
    explanation: String,
    options: Vec<AnswerOption>,
    created_at: DateTime<Utc>,
}

impl QuizItem {
    /// Creates a new quiz item.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyQuestion` for a blank question,
    /// `QuizError::NoOptions` for an empty option set,
    /// `QuizError::NoCorrectOption` when nothing is flagged correct, and
    /// `QuizError::DuplicateOption` when two options share an id.
    pub fn new(
        id: QuizId,
        category_id: CategoryId,
        question: impl Into<String>,
        explanation: impl Into<String>,
        options: Vec<AnswerOption>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(QuizError::EmptyQuestion);
        }
        if options.is_empty() {
            return Err(QuizError::NoOptions);
        }
        if !options.iter().any(AnswerOption::is_correct) {
            return Err(QuizError::NoCorrectOption);
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(option.id()) {
                return Err(QuizError::DuplicateOption {
                    option_id: option.id(),
                });
            }
        }

        Ok(Self {
            id,
            category_id,
            question: question.trim().to_owned(),
            explanation: explanation.into(),
            options,
            created_at,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Explanation shown on the feedback screen. May be empty.
    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Ids of every option flagged correct.
    #[must_use]
    pub fn correct_option_ids(&self) -> HashSet<OptionId> {
        self.options
            .iter()
            .filter(|option| option.is_correct())
            .map(AnswerOption::id)
            .collect()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn option(id: u64, correct: bool) -> AnswerOption {
        AnswerOption::new(OptionId::new(id), format!("option {id}"), correct).unwrap()
    }

    #[test]
    fn option_rejects_empty_label() {
        let err = AnswerOption::new(OptionId::new(1), "  ", true).unwrap_err();
        assert_eq!(err, OptionError::EmptyLabel);
    }

    #[test]
    fn option_trims_label() {
        let opt = AnswerOption::new(OptionId::new(1), "  Paris  ", true).unwrap();
        assert_eq!(opt.label(), "Paris");
        assert!(opt.is_correct());
    }

    #[test]
    fn quiz_rejects_empty_question() {
        let err = QuizItem::new(
            QuizId::new(1),
            CategoryId::new(1),
            "   ",
            "",
            vec![option(1, true)],
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, QuizError::EmptyQuestion);
    }

    #[test]
    fn quiz_rejects_no_options() {
        let err = QuizItem::new(
            QuizId::new(1),
            CategoryId::new(1),
            "Q",
            "",
            Vec::new(),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, QuizError::NoOptions);
    }

    #[test]
    fn quiz_rejects_all_incorrect_options() {
        let err = QuizItem::new(
            QuizId::new(1),
            CategoryId::new(1),
            "Q",
            "",
            vec![option(1, false), option(2, false)],
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, QuizError::NoCorrectOption);
    }

    #[test]
    fn quiz_rejects_duplicate_option_ids() {
        let err = QuizItem::new(
            QuizId::new(1),
            CategoryId::new(1),
            "Q",
            "",
            vec![option(1, true), option(1, false)],
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuizError::DuplicateOption {
                option_id: OptionId::new(1)
            }
        );
    }

    #[test]
    fn quiz_happy_path_and_correct_ids() {
        let quiz = QuizItem::new(
            QuizId::new(7),
            CategoryId::new(2),
            "Which are primary colors?",
            "Red and blue are primary; green is not.",
            vec![option(1, true), option(2, true), option(3, false)],
            fixed_now(),
        )
        .unwrap();

        assert_eq!(quiz.id(), QuizId::new(7));
        assert_eq!(quiz.category_id(), CategoryId::new(2));
        assert_eq!(quiz.options().len(), 3);

        let correct = quiz.correct_option_ids();
        assert_eq!(correct.len(), 2);
        assert!(correct.contains(&OptionId::new(1)));
        assert!(correct.contains(&OptionId::new(2)));
    }
}
