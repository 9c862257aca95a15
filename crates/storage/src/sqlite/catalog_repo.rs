use quiz_core::model::{Category, CategoryId, QuizId, QuizItem};

use super::mapping::{id_i64, map_category_row, map_option_row, map_quiz_row, quiz_id_from_i64, ser};
use super::SqliteRepository;
use crate::repository::{CatalogRepository, StorageError};
use sqlx::Row;

impl SqliteRepository {
    /// Seed or replace a category row.
    ///
    /// Catalog authoring is out of the play flow's hands, but the seed binary
    /// and integration tests need a write path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the row cannot be stored.
    pub async fn upsert_category(&self, category: &Category) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO categories (id, name, description, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                -- keep created_at from the original insert
                name = excluded.name,
                description = excluded.description
            ",
        )
        .bind(id_i64("category_id", category.id().value())?)
        .bind(category.name().to_owned())
        .bind(category.description().map(str::to_owned))
        .bind(category.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    /// Seed or replace a quiz item and its full option set.
    ///
    /// Options are rewritten wholesale; stale rows for the item are removed
    /// first so the stored set always matches the domain value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any row cannot be stored.
    pub async fn upsert_quiz(&self, quiz: &QuizItem) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO quizzes (id, category_id, question, explanation, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                category_id = excluded.category_id,
                question = excluded.question,
                explanation = excluded.explanation
            ",
        )
        .bind(id_i64("quiz_id", quiz.id().value())?)
        .bind(id_i64("category_id", quiz.category_id().value())?)
        .bind(quiz.question().to_owned())
        .bind(quiz.explanation().to_owned())
        .bind(quiz.created_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        sqlx::query("DELETE FROM options WHERE quiz_id = ?1")
            .bind(id_i64("quiz_id", quiz.id().value())?)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        for option in quiz.options() {
            sqlx::query(
                r"
                INSERT INTO options (id, quiz_id, label, is_correct)
                VALUES (?1, ?2, ?3, ?4)
                ",
            )
            .bind(id_i64("option_id", option.id().value())?)
            .bind(id_i64("quiz_id", quiz.id().value())?)
            .bind(option.label().to_owned())
            .bind(i64::from(option.is_correct()))
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn load_options(&self, quiz_id: QuizId) -> Result<Vec<quiz_core::model::AnswerOption>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, label, is_correct
            FROM options
            WHERE quiz_id = ?1
            ORDER BY id ASC
            ",
        )
        .bind(id_i64("quiz_id", quiz_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut options = Vec::with_capacity(rows.len());
        for row in rows {
            options.push(map_option_row(&row)?);
        }
        Ok(options)
    }
}

#[async_trait::async_trait]
impl CatalogRepository for SqliteRepository {
    async fn list_categories(&self) -> Result<Vec<Category>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, description, created_at
            FROM categories
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut categories = Vec::with_capacity(rows.len());
        for row in rows {
            categories.push(map_category_row(&row)?);
        }
        Ok(categories)
    }

    async fn get_category(&self, id: CategoryId) -> Result<Category, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, name, description, created_at
            FROM categories
            WHERE id = ?1
            ",
        )
        .bind(id_i64("category_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        map_category_row(&row)
    }

    async fn quiz_ids(&self, category_id: CategoryId) -> Result<Vec<QuizId>, StorageError> {
        // NotFound for an unknown category, not an empty list.
        self.get_category(category_id).await?;

        let rows = sqlx::query(
            r"
            SELECT id
            FROM quizzes
            WHERE category_id = ?1
            ORDER BY id ASC
            ",
        )
        .bind(id_i64("category_id", category_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(quiz_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?);
        }
        Ok(ids)
    }

    async fn get_quiz(
        &self,
        category_id: CategoryId,
        quiz_id: QuizId,
    ) -> Result<QuizItem, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, category_id, question, explanation, created_at
            FROM quizzes
            WHERE id = ?1 AND category_id = ?2
            ",
        )
        .bind(id_i64("quiz_id", quiz_id.value())?)
        .bind(id_i64("category_id", category_id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        let options = self.load_options(quiz_id).await?;
        map_quiz_row(&row, options)
    }
}
