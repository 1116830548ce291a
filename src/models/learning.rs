use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use super::utc;

#[derive(Serialize, Clone)]
pub struct Flashcard {
    pub id: i64,
    pub lesson_id: i64,
    pub hanzi: String,
    pub pinyin: String,
    pub meaning: String,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbFlashcard {
    pub id: i64,
    pub lesson_id: i64,
    pub hanzi: String,
    pub pinyin: String,
    pub meaning: String,
}

impl From<DbFlashcard> for Flashcard {
    fn from(card: DbFlashcard) -> Self {
        Self {
            id: card.id,
            lesson_id: card.lesson_id,
            hanzi: card.hanzi,
            pinyin: card.pinyin,
            meaning: card.meaning,
        }
    }
}

/// Wire form of a quiz. The correct answer stays server-side; clients only
/// ever see the four options.
#[derive(Serialize, Clone)]
pub struct Quiz {
    pub id: i64,
    pub lesson_id: i64,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub is_active: bool,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbQuiz {
    pub id: i64,
    pub lesson_id: i64,
    pub question: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
    pub is_active: bool,
}

impl From<DbQuiz> for Quiz {
    fn from(quiz: DbQuiz) -> Self {
        Self {
            id: quiz.id,
            lesson_id: quiz.lesson_id,
            question: quiz.question,
            option_a: quiz.option_a,
            option_b: quiz.option_b,
            option_c: quiz.option_c,
            option_d: quiz.option_d,
            is_active: quiz.is_active,
        }
    }
}

#[derive(Serialize, Clone)]
pub struct Lesson {
    pub id: i64,
    pub chapter_id: i64,
    pub title: String,
    pub content: String,
    pub photo: Option<String>,
    pub order: i64,
    pub is_published: bool,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub flashcards: Vec<Flashcard>,
    pub quizzes: Vec<Quiz>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbLesson {
    pub id: i64,
    pub chapter_id: i64,
    pub title: String,
    pub content: String,
    pub photo: Option<String>,
    pub sort_order: i64,
    pub is_published: bool,
    pub created_by: Option<i64>,
    pub created_at: NaiveDateTime,
}

impl From<DbLesson> for Lesson {
    fn from(lesson: DbLesson) -> Self {
        Self {
            id: lesson.id,
            chapter_id: lesson.chapter_id,
            title: lesson.title,
            content: lesson.content,
            photo: lesson.photo,
            order: lesson.sort_order,
            is_published: lesson.is_published,
            created_by: lesson.created_by,
            created_at: utc(lesson.created_at),
            // Filled in by the data layer.
            flashcards: Vec::new(),
            quizzes: Vec::new(),
        }
    }
}

#[derive(Serialize, Clone)]
pub struct Chapter {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub order: i64,
    pub is_published: bool,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub lessons: Vec<Lesson>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbChapter {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub sort_order: i64,
    pub is_published: bool,
    pub created_by: Option<i64>,
    pub created_at: NaiveDateTime,
}

impl From<DbChapter> for Chapter {
    fn from(chapter: DbChapter) -> Self {
        Self {
            id: chapter.id,
            title: chapter.title,
            description: chapter.description,
            order: chapter.sort_order,
            is_published: chapter.is_published,
            created_by: chapter.created_by,
            created_at: utc(chapter.created_at),
            lessons: Vec::new(),
        }
    }
}
