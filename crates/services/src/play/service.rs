use std::collections::HashSet;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use quiz_core::Clock;
use quiz_core::answer::evaluate_selection;
use quiz_core::model::{Category, CategoryId, Ledger, OptionId, QuizId, SessionKey, SessionState};
use storage::repository::{CatalogRepository, SessionStore, Storage};

use super::shuffle::build_ledger;
use super::view::{AnswerFeedback, NextStep, QuizView, ResultView, StartView};
use crate::error::PlayError;

/// Orchestrates one category play-through per session key.
///
/// Every operation is a full read-modify-write against the session store;
/// the service itself holds no per-player state, so one instance serves any
/// number of sessions. Concurrent submits from the same session are not
/// serialized: last write wins on the stored state.
#[derive(Clone)]
pub struct PlayService {
    clock: Clock,
    catalog: Arc<dyn CatalogRepository>,
    sessions: Arc<dyn SessionStore>,
    shuffle_seed: Option<u64>,
}

impl PlayService {
    #[must_use]
    pub fn new(
        clock: Clock,
        catalog: Arc<dyn CatalogRepository>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            clock,
            catalog,
            sessions,
            shuffle_seed: None,
        }
    }

    /// Convenience constructor over a bundled `Storage`.
    #[must_use]
    pub fn from_storage(clock: Clock, storage: &Storage) -> Self {
        Self::new(clock, storage.catalog.clone(), storage.sessions.clone())
    }

    /// Pin the question order to a fixed seed. Meant for tests; without it
    /// each session draws a fresh random permutation.
    #[must_use]
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// All playable categories, for the landing screen.
    ///
    /// # Errors
    ///
    /// Returns `PlayError::Storage` on catalog failures.
    pub async fn categories(&self) -> Result<Vec<Category>, PlayError> {
        Ok(self.catalog.list_categories().await?)
    }

    /// Start screen for a category. Clears any session state left over from
    /// an earlier play-through, so the next question request starts fresh.
    ///
    /// # Errors
    ///
    /// Returns `PlayError::Storage` with `StorageError::NotFound` for an
    /// unknown category, or other storage failures.
    pub async fn start_screen(
        &self,
        key: SessionKey,
        category_id: CategoryId,
    ) -> Result<StartView, PlayError> {
        self.sessions.clear(key, category_id).await?;
        let category = self.catalog.get_category(category_id).await?;
        let quiz_count = self.catalog.quiz_ids(category_id).await?.len();

        tracing::debug!(category_id = %category_id, quiz_count, "session reset at start screen");

        Ok(StartView {
            category,
            quiz_count,
        })
    }

    /// Serve the next unanswered question, creating the session on first
    /// visit. `NextStep::Results` is the navigation signal for a fully
    /// answered (or empty) category.
    ///
    /// # Errors
    ///
    /// Returns `PlayError::Storage` with `StorageError::NotFound` for an
    /// unknown category, or when the ledger references a quiz item the
    /// catalog no longer has. Both are fatal for the request.
    pub async fn next_question(
        &self,
        key: SessionKey,
        category_id: CategoryId,
    ) -> Result<NextStep, PlayError> {
        let state = self.load_or_start(key, category_id).await?;

        let Some(entry) = state.ledger().next_unanswered() else {
            return Ok(NextStep::Results);
        };

        let quiz = self.catalog.get_quiz(category_id, entry.quiz_id()).await?;
        let summary = state.ledger().summary();

        Ok(NextStep::Question(QuizView {
            category_id,
            quiz,
            position: summary.answered + 1,
            total: summary.total,
        }))
    }

    /// Evaluate a selection for one quiz item, record the outcome, and
    /// return the feedback payload.
    ///
    /// # Errors
    ///
    /// Returns `PlayError::NoSession` when no session exists for the pair,
    /// `PlayError::Storage` with `StorageError::NotFound` for an unknown
    /// quiz item, and `PlayError::Ledger` when the ledger has no open entry
    /// for the item (catalog divergence or a duplicate submit).
    pub async fn submit_answer(
        &self,
        key: SessionKey,
        category_id: CategoryId,
        quiz_id: QuizId,
        selected: HashSet<OptionId>,
    ) -> Result<AnswerFeedback, PlayError> {
        let Some(mut state) = self.sessions.load(key, category_id).await? else {
            return Err(PlayError::NoSession);
        };

        let quiz = self.catalog.get_quiz(category_id, quiz_id).await?;
        let is_correct = evaluate_selection(&selected, quiz.options());

        if let Err(err) = state.ledger_mut().record_result(quiz_id, is_correct) {
            tracing::warn!(
                category_id = %category_id,
                quiz_id = %quiz_id,
                error = %err,
                "ledger rejected answer"
            );
            return Err(err.into());
        }

        self.sessions.save(key, category_id, &state).await?;

        Ok(AnswerFeedback {
            category_id,
            is_correct,
            quiz,
            selected,
        })
    }

    /// Final score for the session. State is left in place so the result
    /// screen can be revisited until the next explicit restart.
    ///
    /// # Errors
    ///
    /// Returns `PlayError::NoSession` when no session exists for the pair,
    /// or `PlayError::Storage` on store failures.
    pub async fn results(
        &self,
        key: SessionKey,
        category_id: CategoryId,
    ) -> Result<ResultView, PlayError> {
        let Some(state) = self.sessions.load(key, category_id).await? else {
            return Err(PlayError::NoSession);
        };

        let summary = state.ledger().summary();
        Ok(ResultView {
            category_id,
            question_count: summary.total,
            correct_count: summary.correct,
        })
    }

    async fn load_or_start(
        &self,
        key: SessionKey,
        category_id: CategoryId,
    ) -> Result<SessionState, PlayError> {
        if let Some(state) = self.sessions.load(key, category_id).await? {
            return Ok(state);
        }

        let quiz_ids = self.catalog.quiz_ids(category_id).await?;
        let ledger = self.shuffled_ledger(&quiz_ids)?;
        let state = SessionState::new(category_id, ledger, self.clock.now());
        self.sessions.save(key, category_id, &state).await?;

        tracing::debug!(
            category_id = %category_id,
            quiz_count = state.ledger().len(),
            "started quiz session"
        );

        Ok(state)
    }

    fn shuffled_ledger(&self, quiz_ids: &[QuizId]) -> Result<Ledger, PlayError> {
        let ledger = match self.shuffle_seed {
            Some(seed) => build_ledger(quiz_ids, &mut StdRng::seed_from_u64(seed))?,
            None => build_ledger(quiz_ids, &mut rand::rng())?,
        };
        Ok(ledger)
    }
}
