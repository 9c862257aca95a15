//! Correctness judgement for a single quiz item.

use std::collections::HashSet;

use crate::model::{AnswerOption, OptionId};

/// Decides whether a selection answers a quiz item correctly.
///
/// The selection must equal the set of correct option ids: same cardinality
/// and every selected id flagged correct. Order never matters. An empty
/// selection against an item with at least one correct option is wrong, and
/// ids that do not belong to the item simply fail the containment check.
///
/// Pure; safe to call any number of times with catalog data.
#[must_use]
pub fn evaluate_selection(selected: &HashSet<OptionId>, options: &[AnswerOption]) -> bool {
    let correct: HashSet<OptionId> = options
        .iter()
        .filter(|option| option.is_correct())
        .map(AnswerOption::id)
        .collect();

    if selected.len() != correct.len() {
        return false;
    }
    selected.iter().all(|id| correct.contains(id))
}
