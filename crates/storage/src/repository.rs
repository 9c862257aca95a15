use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{Category, CategoryId, QuizId, QuizItem, SessionKey, SessionState};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read-side contract for quiz catalog content (the Catalog Provider).
///
/// The play flow never writes through this trait; categories, quiz items and
/// options are authored elsewhere.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// List every category, in stable id order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError>;

    /// Fetch a category by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_category(&self, id: CategoryId) -> Result<Category, StorageError>;

    /// Ids of every quiz item in a category, in stable storage order.
    ///
    /// Randomizing the play order is the session initializer's job, not the
    /// catalog's.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the category is missing, or other
    /// storage errors.
    async fn quiz_ids(&self, category_id: CategoryId) -> Result<Vec<QuizId>, StorageError>;

    /// Fetch one quiz item with its options.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the item is missing or belongs to
    /// a different category, or other storage errors.
    async fn get_quiz(
        &self,
        category_id: CategoryId,
        quiz_id: QuizId,
    ) -> Result<QuizItem, StorageError>;
}

/// Persistence contract for per-player session state, keyed by the opaque
/// session key plus the category being played.
///
/// The store treats the state as a blob; it never inspects the ledger.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the state for a session/category pair, if any exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn load(
        &self,
        key: SessionKey,
        category_id: CategoryId,
    ) -> Result<Option<SessionState>, StorageError>;

    /// Persist (insert or overwrite) the state for a session/category pair.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn save(
        &self,
        key: SessionKey,
        category_id: CategoryId,
        state: &SessionState,
    ) -> Result<(), StorageError>;

    /// Remove any state for a session/category pair. Clearing an absent pair
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn clear(&self, key: SessionKey, category_id: CategoryId) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Quiz items live in a `BTreeMap` so `quiz_ids` has the same stable id
/// ordering the `SQLite` backend produces.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    categories: Arc<Mutex<BTreeMap<CategoryId, Category>>>,
    quizzes: Arc<Mutex<BTreeMap<(CategoryId, QuizId), QuizItem>>>,
    sessions: Arc<Mutex<HashMap<(SessionKey, CategoryId), SessionState>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or replace a category.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backing lock is poisoned.
    pub fn upsert_category(&self, category: &Category) -> Result<(), StorageError> {
        let mut guard = self
            .categories
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(category.id(), category.clone());
        Ok(())
    }

    /// Seed or replace a quiz item under its category.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the backing lock is poisoned.
    pub fn upsert_quiz(&self, quiz: &QuizItem) -> Result<(), StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert((quiz.category_id(), quiz.id()), quiz.clone());
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for InMemoryRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        let guard = self
            .categories
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().cloned().collect())
    }

    async fn get_category(&self, id: CategoryId) -> Result<Category, StorageError> {
        let guard = self
            .categories
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn quiz_ids(&self, category_id: CategoryId) -> Result<Vec<QuizId>, StorageError> {
        // Mirror the SQL backend: an unknown category is NotFound even when
        // the answer would otherwise just be an empty list.
        self.get_category(category_id).await?;

        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .keys()
            .filter(|(cat, _)| *cat == category_id)
            .map(|(_, quiz_id)| *quiz_id)
            .collect())
    }

    async fn get_quiz(
        &self,
        category_id: CategoryId,
        quiz_id: QuizId,
    ) -> Result<QuizItem, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(&(category_id, quiz_id))
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl SessionStore for InMemoryRepository {
    async fn load(
        &self,
        key: SessionKey,
        category_id: CategoryId,
    ) -> Result<Option<SessionState>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&(key, category_id)).cloned())
    }

    async fn save(
        &self,
        key: SessionKey,
        category_id: CategoryId,
        state: &SessionState,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert((key, category_id), state.clone());
        Ok(())
    }

    async fn clear(&self, key: SessionKey, category_id: CategoryId) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&(key, category_id));
        Ok(())
    }
}

/// Aggregates the catalog and session backends behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub catalog: Arc<dyn CatalogRepository>,
    pub sessions: Arc<dyn SessionStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let catalog: Arc<dyn CatalogRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionStore> = Arc::new(repo);
        Self { catalog, sessions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerOption, Ledger, LedgerEntry, OptionId};
    use quiz_core::time::fixed_now;

    fn build_category(id: u64) -> Category {
        Category::new(CategoryId::new(id), format!("Category {id}"), None, fixed_now()).unwrap()
    }

    fn build_quiz(id: u64, category_id: CategoryId) -> QuizItem {
        let options = vec![
            AnswerOption::new(OptionId::new(id * 10 + 1), "right", true).unwrap(),
            AnswerOption::new(OptionId::new(id * 10 + 2), "wrong", false).unwrap(),
        ];
        QuizItem::new(
            QuizId::new(id),
            category_id,
            format!("Question {id}"),
            "",
            options,
            fixed_now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn catalog_roundtrip_and_ordering() {
        let repo = InMemoryRepository::new();
        let category = build_category(1);
        repo.upsert_category(&category).unwrap();

        // Insert out of id order; quiz_ids must come back sorted.
        for id in [3_u64, 1, 2] {
            repo.upsert_quiz(&build_quiz(id, category.id())).unwrap();
        }

        let ids = repo.quiz_ids(category.id()).await.unwrap();
        assert_eq!(ids, vec![QuizId::new(1), QuizId::new(2), QuizId::new(3)]);

        let quiz = repo.get_quiz(category.id(), QuizId::new(2)).await.unwrap();
        assert_eq!(quiz.question(), "Question 2");
    }

    #[tokio::test]
    async fn quiz_ids_unknown_category_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo.quiz_ids(CategoryId::new(9)).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn get_quiz_respects_category_boundary() {
        let repo = InMemoryRepository::new();
        let category = build_category(1);
        let other = build_category(2);
        repo.upsert_category(&category).unwrap();
        repo.upsert_category(&other).unwrap();
        repo.upsert_quiz(&build_quiz(1, category.id())).unwrap();

        let err = repo.get_quiz(other.id(), QuizId::new(1)).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn session_store_load_save_clear() {
        let repo = InMemoryRepository::new();
        let key = SessionKey::generate();
        let category_id = CategoryId::new(1);

        assert!(repo.load(key, category_id).await.unwrap().is_none());

        let ledger =
            Ledger::from_entries(vec![LedgerEntry::unanswered(QuizId::new(1))]).unwrap();
        let state = SessionState::new(category_id, ledger, fixed_now());
        repo.save(key, category_id, &state).await.unwrap();

        let loaded = repo.load(key, category_id).await.unwrap().unwrap();
        assert_eq!(loaded, state);

        // Keyed per category: another category sees nothing.
        assert!(repo.load(key, CategoryId::new(2)).await.unwrap().is_none());

        repo.clear(key, category_id).await.unwrap();
        assert!(repo.load(key, category_id).await.unwrap().is_none());

        // Clearing again is a no-op, not an error.
        repo.clear(key, category_id).await.unwrap();
    }

    #[tokio::test]
    async fn in_memory_storage_bundle_wires_both_traits() {
        let storage = Storage::in_memory();
        assert!(storage.catalog.list_categories().await.unwrap().is_empty());

        let key = SessionKey::generate();
        let category_id = CategoryId::new(1);
        assert!(storage.sessions.load(key, category_id).await.unwrap().is_none());

        let ledger =
            Ledger::from_entries(vec![LedgerEntry::unanswered(QuizId::new(1))]).unwrap();
        let state = SessionState::new(category_id, ledger, fixed_now());
        storage.sessions.save(key, category_id, &state).await.unwrap();

        let loaded = storage.sessions.load(key, category_id).await.unwrap().unwrap();
        assert_eq!(loaded, state);
    }
}
