use quiz_core::model::{AnswerOption, Category, CategoryId, OptionId, QuizId, QuizItem};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn category_id_from_i64(v: i64) -> Result<CategoryId, StorageError> {
    Ok(CategoryId::new(i64_to_u64("category_id", v)?))
}

pub(crate) fn quiz_id_from_i64(v: i64) -> Result<QuizId, StorageError> {
    Ok(QuizId::new(i64_to_u64("quiz_id", v)?))
}

pub(crate) fn option_id_from_i64(v: i64) -> Result<OptionId, StorageError> {
    Ok(OptionId::new(i64_to_u64("option_id", v)?))
}

pub(crate) fn map_category_row(row: &sqlx::sqlite::SqliteRow) -> Result<Category, StorageError> {
    Category::new(
        category_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get::<Option<String>, _>("description").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_option_row(row: &sqlx::sqlite::SqliteRow) -> Result<AnswerOption, StorageError> {
    let is_correct: i64 = row.try_get("is_correct").map_err(ser)?;
    AnswerOption::new(
        option_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        row.try_get::<String, _>("label").map_err(ser)?,
        is_correct != 0,
    )
    .map_err(ser)
}

/// Assembles a quiz item from its row plus the already-mapped option rows.
///
/// Domain validation runs on the way out, so a catalog row that lost all of
/// its correct options surfaces as a serialization error instead of a quiz
/// item the evaluator can never mark right.
pub(crate) fn map_quiz_row(
    row: &sqlx::sqlite::SqliteRow,
    options: Vec<AnswerOption>,
) -> Result<QuizItem, StorageError> {
    QuizItem::new(
        quiz_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        category_id_from_i64(row.try_get::<i64, _>("category_id").map_err(ser)?)?,
        row.try_get::<String, _>("question").map_err(ser)?,
        row.try_get::<String, _>("explanation").map_err(ser)?,
        options,
        row.try_get("created_at").map_err(ser)?,
    )
    .map_err(ser)
}
