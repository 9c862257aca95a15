use std::collections::HashSet;

use quiz_core::model::{Category, CategoryId, OptionId, QuizItem};

// Presentation-agnostic payloads for the four play screens. No pre-formatted
// strings and no localization assumptions; the host renders them however it
// likes.

/// Start screen: the category about to be played and how many questions it
/// holds. Producing this view also discards any previous session state for
/// the category.
#[derive(Debug, Clone, PartialEq)]
pub struct StartView {
    pub category: Category,
    pub quiz_count: usize,
}

/// Question screen: one quiz item plus where the player is in the session.
///
/// `position` is 1-based ("question 3 of 10" renders directly from
/// `position`/`total`).
#[derive(Debug, Clone, PartialEq)]
pub struct QuizView {
    pub category_id: CategoryId,
    pub quiz: QuizItem,
    pub position: usize,
    pub total: usize,
}

/// Outcome of asking for the next question: either a question to render or
/// the signal to navigate to the result screen.
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep {
    Question(QuizView),
    Results,
}

/// Feedback screen: the verdict for one answered item, with the full option
/// set and the player's own selection echoed back for highlighting.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerFeedback {
    pub category_id: CategoryId,
    pub is_correct: bool,
    pub quiz: QuizItem,
    pub selected: HashSet<OptionId>,
}

/// Result screen: final score for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultView {
    pub category_id: CategoryId,
    pub question_count: usize,
    pub correct_count: usize,
}
