use chrono::Utc;
use quiz_core::model::{CategoryId, SessionKey, SessionState};
use sqlx::Row;

use super::mapping::{id_i64, ser};
use super::SqliteRepository;
use crate::repository::{SessionStore, StorageError};

// State is stored as a JSON blob: the store's contract is opaque
// per-session data, and the ledger shape can evolve without schema changes.

#[async_trait::async_trait]
impl SessionStore for SqliteRepository {
    async fn load(
        &self,
        key: SessionKey,
        category_id: CategoryId,
    ) -> Result<Option<SessionState>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT state
            FROM play_sessions
            WHERE session_key = ?1 AND category_id = ?2
            ",
        )
        .bind(key.to_string())
        .bind(id_i64("category_id", category_id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let blob: String = row.try_get("state").map_err(ser)?;
        let state: SessionState = serde_json::from_str(&blob).map_err(ser)?;
        Ok(Some(state))
    }

    async fn save(
        &self,
        key: SessionKey,
        category_id: CategoryId,
        state: &SessionState,
    ) -> Result<(), StorageError> {
        let blob = serde_json::to_string(state).map_err(ser)?;

        sqlx::query(
            r"
            INSERT INTO play_sessions (session_key, category_id, state, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(session_key, category_id) DO UPDATE SET
                state = excluded.state,
                updated_at = excluded.updated_at
            ",
        )
        .bind(key.to_string())
        .bind(id_i64("category_id", category_id.value())?)
        .bind(blob)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn clear(&self, key: SessionKey, category_id: CategoryId) -> Result<(), StorageError> {
        sqlx::query(
            r"
            DELETE FROM play_sessions
            WHERE session_key = ?1 AND category_id = ?2
            ",
        )
        .bind(key.to_string())
        .bind(id_i64("category_id", category_id.value())?)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
