use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use super::utc;

#[derive(Serialize, Clone)]
pub struct LessonProgress {
    pub id: i64,
    pub user_id: i64,
    pub lesson_id: i64,
    pub completed: bool,
    pub score: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbLessonProgress {
    pub id: i64,
    pub user_id: i64,
    pub lesson_id: i64,
    pub completed: bool,
    pub score: i64,
    pub updated_at: NaiveDateTime,
}

impl From<DbLessonProgress> for LessonProgress {
    fn from(progress: DbLessonProgress) -> Self {
        Self {
            id: progress.id,
            user_id: progress.user_id,
            lesson_id: progress.lesson_id,
            completed: progress.completed,
            score: progress.score,
            updated_at: utc(progress.updated_at),
        }
    }
}
