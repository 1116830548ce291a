use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::{AppError, conflict_on_unique};
use crate::models::{DbLessonProgress, LessonProgress};

// Every query here is scoped to the owning user; a caller can never reach
// another user's rows through this module.

#[instrument]
pub async fn get_progress_for_user(
    pool: &Pool<Sqlite>,
    user_id: i64,
) -> Result<Vec<LessonProgress>, AppError> {
    let rows = sqlx::query_as::<_, DbLessonProgress>(
        "SELECT * FROM lesson_progress WHERE user_id = ? ORDER BY updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(LessonProgress::from).collect())
}

#[instrument]
pub async fn get_progress_record(
    pool: &Pool<Sqlite>,
    id: i64,
    user_id: i64,
) -> Result<LessonProgress, AppError> {
    let row = sqlx::query_as::<_, DbLessonProgress>(
        "SELECT * FROM lesson_progress WHERE id = ? AND user_id = ?",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(progress) => Ok(LessonProgress::from(progress)),
        _ => Err(AppError::NotFound(format!(
            "Progress record {} not found",
            id
        ))),
    }
}

#[instrument(skip(pool))]
pub async fn create_progress(
    pool: &Pool<Sqlite>,
    user_id: i64,
    lesson_id: i64,
    completed: bool,
    score: i64,
) -> Result<i64, AppError> {
    info!("Recording lesson progress");

    let lesson: Option<(i64,)> = sqlx::query_as("SELECT id FROM lessons WHERE id = ?")
        .bind(lesson_id)
        .fetch_optional(pool)
        .await?;
    if lesson.is_none() {
        return Err(AppError::Validation(format!(
            "Lesson {} does not exist",
            lesson_id
        )));
    }

    let res = sqlx::query(
        "INSERT INTO lesson_progress (user_id, lesson_id, completed, score) VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(lesson_id)
    .bind(completed)
    .bind(score)
    .execute(pool)
    .await
    .map_err(|e| conflict_on_unique(e, "Progress already recorded for this lesson"))?;

    Ok(res.last_insert_rowid())
}

#[instrument(skip(pool))]
pub async fn update_progress(
    pool: &Pool<Sqlite>,
    id: i64,
    user_id: i64,
    completed: bool,
    score: i64,
) -> Result<(), AppError> {
    info!("Updating lesson progress");

    let now = chrono::Utc::now().naive_utc();
    let res = sqlx::query(
        "UPDATE lesson_progress SET completed = ?, score = ?, updated_at = ?
         WHERE id = ? AND user_id = ?",
    )
    .bind(completed)
    .bind(score)
    .bind(now)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Progress record {} not found",
            id
        )));
    }

    Ok(())
}

#[instrument]
pub async fn delete_progress(pool: &Pool<Sqlite>, id: i64, user_id: i64) -> Result<(), AppError> {
    info!("Deleting lesson progress");

    let res = sqlx::query("DELETE FROM lesson_progress WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Progress record {} not found",
            id
        )));
    }

    Ok(())
}
