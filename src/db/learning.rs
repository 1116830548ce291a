use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::models::{
    Chapter, DbChapter, DbFlashcard, DbLesson, DbQuiz, Flashcard, Lesson, Quiz,
};
use crate::validation::validate_answer_letter;

// Published-only filtering happens here, at the collection source, so it
// applies to every role the same way.

#[instrument]
pub async fn get_published_chapters(pool: &Pool<Sqlite>) -> Result<Vec<Chapter>, AppError> {
    info!("Listing published chapters");

    let rows = sqlx::query_as::<_, DbChapter>(
        "SELECT * FROM chapters WHERE is_published = 1 ORDER BY sort_order",
    )
    .fetch_all(pool)
    .await?;

    let mut chapters = Vec::with_capacity(rows.len());
    for row in rows {
        let mut chapter = Chapter::from(row);
        chapter.lessons = published_lessons_for_chapter(pool, chapter.id).await?;
        chapters.push(chapter);
    }

    Ok(chapters)
}

#[instrument]
pub async fn get_published_chapter(pool: &Pool<Sqlite>, id: i64) -> Result<Chapter, AppError> {
    let row = sqlx::query_as::<_, DbChapter>(
        "SELECT * FROM chapters WHERE id = ? AND is_published = 1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let mut chapter = Chapter::from(row);
            chapter.lessons = published_lessons_for_chapter(pool, chapter.id).await?;
            Ok(chapter)
        }
        _ => Err(AppError::NotFound(format!("Chapter {} not found", id))),
    }
}

async fn published_lessons_for_chapter(
    pool: &Pool<Sqlite>,
    chapter_id: i64,
) -> Result<Vec<Lesson>, AppError> {
    let rows = sqlx::query_as::<_, DbLesson>(
        "SELECT * FROM lessons WHERE chapter_id = ? AND is_published = 1 ORDER BY sort_order",
    )
    .bind(chapter_id)
    .fetch_all(pool)
    .await?;

    let mut lessons = Vec::with_capacity(rows.len());
    for row in rows {
        lessons.push(load_lesson_children(pool, Lesson::from(row)).await?);
    }

    Ok(lessons)
}

async fn load_lesson_children(
    pool: &Pool<Sqlite>,
    mut lesson: Lesson,
) -> Result<Lesson, AppError> {
    let cards = sqlx::query_as::<_, DbFlashcard>("SELECT * FROM flashcards WHERE lesson_id = ?")
        .bind(lesson.id)
        .fetch_all(pool)
        .await?;
    lesson.flashcards = cards.into_iter().map(Flashcard::from).collect();

    let quizzes = sqlx::query_as::<_, DbQuiz>("SELECT * FROM quizzes WHERE lesson_id = ?")
        .bind(lesson.id)
        .fetch_all(pool)
        .await?;
    lesson.quizzes = quizzes.into_iter().map(Quiz::from).collect();

    Ok(lesson)
}

#[instrument(skip(pool, description))]
pub async fn create_chapter(
    pool: &Pool<Sqlite>,
    title: &str,
    description: &str,
    sort_order: i64,
    is_published: bool,
    created_by: Option<i64>,
) -> Result<i64, AppError> {
    info!("Creating chapter");

    let res = sqlx::query(
        "INSERT INTO chapters (title, description, sort_order, is_published, created_by)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(title)
    .bind(description)
    .bind(sort_order)
    .bind(is_published)
    .bind(created_by)
    .execute(pool)
    .await?;

    Ok(res.last_insert_rowid())
}

#[instrument(skip(pool, description))]
pub async fn update_chapter(
    pool: &Pool<Sqlite>,
    id: i64,
    title: &str,
    description: &str,
    sort_order: i64,
    is_published: bool,
) -> Result<(), AppError> {
    info!("Updating chapter");

    let res = sqlx::query(
        "UPDATE chapters SET title = ?, description = ?, sort_order = ?, is_published = ?
         WHERE id = ?",
    )
    .bind(title)
    .bind(description)
    .bind(sort_order)
    .bind(is_published)
    .bind(id)
    .execute(pool)
    .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Chapter {} not found", id)));
    }

    Ok(())
}

#[instrument]
pub async fn delete_chapter(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting chapter");

    let res = sqlx::query("DELETE FROM chapters WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Chapter {} not found", id)));
    }

    Ok(())
}

#[instrument]
pub async fn get_published_lessons(pool: &Pool<Sqlite>) -> Result<Vec<Lesson>, AppError> {
    info!("Listing published lessons");

    let rows = sqlx::query_as::<_, DbLesson>(
        "SELECT * FROM lessons WHERE is_published = 1 ORDER BY sort_order",
    )
    .fetch_all(pool)
    .await?;

    let mut lessons = Vec::with_capacity(rows.len());
    for row in rows {
        lessons.push(load_lesson_children(pool, Lesson::from(row)).await?);
    }

    Ok(lessons)
}

#[instrument]
pub async fn get_published_lesson(pool: &Pool<Sqlite>, id: i64) -> Result<Lesson, AppError> {
    let row =
        sqlx::query_as::<_, DbLesson>("SELECT * FROM lessons WHERE id = ? AND is_published = 1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

    match row {
        Some(row) => load_lesson_children(pool, Lesson::from(row)).await,
        _ => Err(AppError::NotFound(format!("Lesson {} not found", id))),
    }
}

async fn lesson_exists(pool: &Pool<Sqlite>, lesson_id: i64) -> Result<bool, AppError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM lessons WHERE id = ?")
        .bind(lesson_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

#[instrument(skip(pool, content))]
pub async fn create_lesson(
    pool: &Pool<Sqlite>,
    chapter_id: i64,
    title: &str,
    content: &str,
    photo: Option<&str>,
    sort_order: i64,
    is_published: bool,
    created_by: Option<i64>,
) -> Result<i64, AppError> {
    info!("Creating lesson");

    let chapter: Option<(i64,)> = sqlx::query_as("SELECT id FROM chapters WHERE id = ?")
        .bind(chapter_id)
        .fetch_optional(pool)
        .await?;
    if chapter.is_none() {
        return Err(AppError::Validation(format!(
            "Chapter {} does not exist",
            chapter_id
        )));
    }

    let res = sqlx::query(
        "INSERT INTO lessons (chapter_id, title, content, photo, sort_order, is_published, created_by)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(chapter_id)
    .bind(title)
    .bind(content)
    .bind(photo)
    .bind(sort_order)
    .bind(is_published)
    .bind(created_by)
    .execute(pool)
    .await?;

    Ok(res.last_insert_rowid())
}

#[instrument(skip(pool, content))]
pub async fn update_lesson(
    pool: &Pool<Sqlite>,
    id: i64,
    title: &str,
    content: &str,
    photo: Option<&str>,
    sort_order: i64,
    is_published: bool,
) -> Result<(), AppError> {
    info!("Updating lesson");

    let res = sqlx::query(
        "UPDATE lessons SET title = ?, content = ?, photo = ?, sort_order = ?, is_published = ?
         WHERE id = ?",
    )
    .bind(title)
    .bind(content)
    .bind(photo)
    .bind(sort_order)
    .bind(is_published)
    .bind(id)
    .execute(pool)
    .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Lesson {} not found", id)));
    }

    Ok(())
}

#[instrument]
pub async fn delete_lesson(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting lesson");

    let res = sqlx::query("DELETE FROM lessons WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Lesson {} not found", id)));
    }

    Ok(())
}

#[instrument]
pub async fn get_flashcard(pool: &Pool<Sqlite>, id: i64) -> Result<Flashcard, AppError> {
    let row = sqlx::query_as::<_, DbFlashcard>("SELECT * FROM flashcards WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(card) => Ok(Flashcard::from(card)),
        _ => Err(AppError::NotFound(format!("Flashcard {} not found", id))),
    }
}

#[instrument(skip(pool))]
pub async fn create_flashcard(
    pool: &Pool<Sqlite>,
    lesson_id: i64,
    hanzi: &str,
    pinyin: &str,
    meaning: &str,
) -> Result<i64, AppError> {
    info!("Creating flashcard");

    if !lesson_exists(pool, lesson_id).await? {
        return Err(AppError::Validation(format!(
            "Lesson {} does not exist",
            lesson_id
        )));
    }

    let res = sqlx::query(
        "INSERT INTO flashcards (lesson_id, hanzi, pinyin, meaning) VALUES (?, ?, ?, ?)",
    )
    .bind(lesson_id)
    .bind(hanzi)
    .bind(pinyin)
    .bind(meaning)
    .execute(pool)
    .await?;

    Ok(res.last_insert_rowid())
}

#[instrument(skip(pool))]
pub async fn update_flashcard(
    pool: &Pool<Sqlite>,
    id: i64,
    hanzi: &str,
    pinyin: &str,
    meaning: &str,
) -> Result<(), AppError> {
    info!("Updating flashcard");

    let res = sqlx::query("UPDATE flashcards SET hanzi = ?, pinyin = ?, meaning = ? WHERE id = ?")
        .bind(hanzi)
        .bind(pinyin)
        .bind(meaning)
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Flashcard {} not found", id)));
    }

    Ok(())
}

#[instrument]
pub async fn delete_flashcard(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting flashcard");

    let res = sqlx::query("DELETE FROM flashcards WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Flashcard {} not found", id)));
    }

    Ok(())
}

/// Row form, answer included. Only the update path needs it; nothing here
/// is ever serialized to a client.
#[instrument]
pub async fn get_quiz_row(pool: &Pool<Sqlite>, id: i64) -> Result<DbQuiz, AppError> {
    let row = sqlx::query_as::<_, DbQuiz>("SELECT * FROM quizzes WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(quiz) => Ok(quiz),
        _ => Err(AppError::NotFound(format!("Quiz {} not found", id))),
    }
}

#[allow(clippy::too_many_arguments)]
#[instrument(skip(pool, question))]
pub async fn create_quiz(
    pool: &Pool<Sqlite>,
    lesson_id: i64,
    question: &str,
    option_a: &str,
    option_b: &str,
    option_c: &str,
    option_d: &str,
    correct_answer: &str,
    is_active: bool,
) -> Result<i64, AppError> {
    info!("Creating quiz");

    validate_answer_letter(correct_answer)?;

    if !lesson_exists(pool, lesson_id).await? {
        return Err(AppError::Validation(format!(
            "Lesson {} does not exist",
            lesson_id
        )));
    }

    let res = sqlx::query(
        "INSERT INTO quizzes
         (lesson_id, question, option_a, option_b, option_c, option_d, correct_answer, is_active)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(lesson_id)
    .bind(question)
    .bind(option_a)
    .bind(option_b)
    .bind(option_c)
    .bind(option_d)
    .bind(correct_answer)
    .bind(is_active)
    .execute(pool)
    .await?;

    Ok(res.last_insert_rowid())
}

#[allow(clippy::too_many_arguments)]
#[instrument(skip(pool, question))]
pub async fn update_quiz(
    pool: &Pool<Sqlite>,
    id: i64,
    question: &str,
    option_a: &str,
    option_b: &str,
    option_c: &str,
    option_d: &str,
    correct_answer: &str,
    is_active: bool,
) -> Result<(), AppError> {
    info!("Updating quiz");

    validate_answer_letter(correct_answer)?;

    let res = sqlx::query(
        "UPDATE quizzes
         SET question = ?, option_a = ?, option_b = ?, option_c = ?, option_d = ?,
             correct_answer = ?, is_active = ?
         WHERE id = ?",
    )
    .bind(question)
    .bind(option_a)
    .bind(option_b)
    .bind(option_c)
    .bind(option_d)
    .bind(correct_answer)
    .bind(is_active)
    .bind(id)
    .execute(pool)
    .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Quiz {} not found", id)));
    }

    Ok(())
}

#[instrument]
pub async fn delete_quiz(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting quiz");

    let res = sqlx::query("DELETE FROM quizzes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Quiz {} not found", id)));
    }

    Ok(())
}
