use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::Deserialize;
use sqlx::{Pool, Sqlite};
use validator::Validate;

use crate::auth::{Permission, User};
use crate::db::{
    create_chapter, create_flashcard, create_lesson, create_quiz, delete_chapter,
    delete_flashcard, delete_lesson, delete_quiz, get_flashcard, get_published_chapter,
    get_published_chapters, get_published_lesson, get_published_lessons, get_quiz_row,
    update_chapter, update_flashcard, update_lesson, update_quiz,
};
use crate::models::{Chapter, Lesson};
use crate::validation::{
    AppErrorExt, JsonValidateExt, PermissionCheckExt, ValidationResponse,
};

use super::{CreatedResponse, default_true};

// Reads are open to everyone and only ever see published rows; writes need
// a staff account.

#[get("/chapters")]
pub async fn api_get_chapters(db: &State<Pool<Sqlite>>) -> Result<Json<Vec<Chapter>>, Status> {
    let chapters = get_published_chapters(db).await?;

    Ok(Json(chapters))
}

#[get("/chapters/<id>")]
pub async fn api_get_chapter(id: i64, db: &State<Pool<Sqlite>>) -> Result<Json<Chapter>, Status> {
    let chapter = get_published_chapter(db, id).await?;

    Ok(Json(chapter))
}

#[derive(Deserialize, Validate)]
pub struct ChapterCreateRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    order: i64,
    #[serde(default = "default_true")]
    is_published: bool,
}

#[post("/chapters", data = "<chapter>")]
pub async fn api_create_chapter(
    chapter: Json<ChapterCreateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let validated = chapter.validate_custom()?;

    let id = create_chapter(
        db,
        &validated.title,
        &validated.description,
        validated.order,
        validated.is_published,
        Some(user.id),
    )
    .await
    .validate_custom()?;

    Ok(Custom(Status::Created, Json(CreatedResponse { id })))
}

#[derive(Deserialize)]
pub struct ChapterUpdateRequest {
    title: Option<String>,
    description: Option<String>,
    order: Option<i64>,
    is_published: Option<bool>,
}

#[put("/chapters/<id>", data = "<update>")]
pub async fn api_update_chapter(
    id: i64,
    update: Json<ChapterUpdateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    user.require_permission(Permission::ManageContent)?;

    let existing = get_published_chapter(db, id).await?;

    let title = update.title.clone().unwrap_or(existing.title);
    let description = update.description.clone().unwrap_or(existing.description);
    let order = update.order.unwrap_or(existing.order);
    let is_published = update.is_published.unwrap_or(existing.is_published);

    update_chapter(db, id, &title, &description, order, is_published).await?;

    Ok(Status::Ok)
}

#[delete("/chapters/<id>")]
pub async fn api_delete_chapter(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    user.require_permission(Permission::ManageContent)?;

    // Lookup goes through the published-only collection, like every read.
    get_published_chapter(db, id).await?;
    delete_chapter(db, id).await?;

    Ok(Status::NoContent)
}

#[get("/lessons")]
pub async fn api_get_lessons(db: &State<Pool<Sqlite>>) -> Result<Json<Vec<Lesson>>, Status> {
    let lessons = get_published_lessons(db).await?;

    Ok(Json(lessons))
}

#[get("/lessons/<id>")]
pub async fn api_get_lesson(id: i64, db: &State<Pool<Sqlite>>) -> Result<Json<Lesson>, Status> {
    let lesson = get_published_lesson(db, id).await?;

    Ok(Json(lesson))
}

#[derive(Deserialize, Validate)]
pub struct LessonCreateRequest {
    chapter_id: i64,
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    title: String,
    #[serde(default)]
    content: String,
    photo: Option<String>,
    #[serde(default)]
    order: i64,
    #[serde(default = "default_true")]
    is_published: bool,
}

#[post("/lessons", data = "<lesson>")]
pub async fn api_create_lesson(
    lesson: Json<LessonCreateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let validated = lesson.validate_custom()?;

    let id = create_lesson(
        db,
        validated.chapter_id,
        &validated.title,
        &validated.content,
        validated.photo.as_deref(),
        validated.order,
        validated.is_published,
        Some(user.id),
    )
    .await
    .validate_custom()?;

    Ok(Custom(Status::Created, Json(CreatedResponse { id })))
}

#[derive(Deserialize)]
pub struct LessonUpdateRequest {
    title: Option<String>,
    content: Option<String>,
    photo: Option<String>,
    order: Option<i64>,
    is_published: Option<bool>,
}

#[put("/lessons/<id>", data = "<update>")]
pub async fn api_update_lesson(
    id: i64,
    update: Json<LessonUpdateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    user.require_permission(Permission::ManageContent)?;

    let existing = get_published_lesson(db, id).await?;

    let title = update.title.clone().unwrap_or(existing.title);
    let content = update.content.clone().unwrap_or(existing.content);
    let photo = update.photo.clone().or(existing.photo);
    let order = update.order.unwrap_or(existing.order);
    let is_published = update.is_published.unwrap_or(existing.is_published);

    update_lesson(db, id, &title, &content, photo.as_deref(), order, is_published).await?;

    Ok(Status::Ok)
}

#[delete("/lessons/<id>")]
pub async fn api_delete_lesson(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    user.require_permission(Permission::ManageContent)?;

    get_published_lesson(db, id).await?;
    delete_lesson(db, id).await?;

    Ok(Status::NoContent)
}

// Flashcards and quizzes are managed here and read through their lesson's
// nested representation.

#[derive(Deserialize, Validate)]
pub struct FlashcardCreateRequest {
    lesson_id: i64,
    #[validate(length(min = 1, max = 20, message = "Hanzi must be 1-20 characters"))]
    hanzi: String,
    #[validate(length(min = 1, max = 100, message = "Pinyin must be 1-100 characters"))]
    pinyin: String,
    #[validate(length(min = 1, max = 200, message = "Meaning must be 1-200 characters"))]
    meaning: String,
}

#[post("/flashcards", data = "<card>")]
pub async fn api_create_flashcard(
    card: Json<FlashcardCreateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let validated = card.validate_custom()?;

    let id = create_flashcard(
        db,
        validated.lesson_id,
        &validated.hanzi,
        &validated.pinyin,
        &validated.meaning,
    )
    .await
    .validate_custom()?;

    Ok(Custom(Status::Created, Json(CreatedResponse { id })))
}

#[derive(Deserialize)]
pub struct FlashcardUpdateRequest {
    hanzi: Option<String>,
    pinyin: Option<String>,
    meaning: Option<String>,
}

#[put("/flashcards/<id>", data = "<update>")]
pub async fn api_update_flashcard(
    id: i64,
    update: Json<FlashcardUpdateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    user.require_permission(Permission::ManageContent)?;

    let existing = get_flashcard(db, id).await?;

    let hanzi = update.hanzi.clone().unwrap_or(existing.hanzi);
    let pinyin = update.pinyin.clone().unwrap_or(existing.pinyin);
    let meaning = update.meaning.clone().unwrap_or(existing.meaning);

    update_flashcard(db, id, &hanzi, &pinyin, &meaning).await?;

    Ok(Status::Ok)
}

#[delete("/flashcards/<id>")]
pub async fn api_delete_flashcard(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    user.require_permission(Permission::ManageContent)?;

    delete_flashcard(db, id).await?;

    Ok(Status::NoContent)
}

#[derive(Deserialize, Validate)]
pub struct QuizCreateRequest {
    lesson_id: i64,
    #[validate(length(min = 1, message = "Question is required"))]
    question: String,
    #[validate(length(min = 1, max = 100, message = "Option A must be 1-100 characters"))]
    option_a: String,
    #[validate(length(min = 1, max = 100, message = "Option B must be 1-100 characters"))]
    option_b: String,
    #[validate(length(min = 1, max = 100, message = "Option C must be 1-100 characters"))]
    option_c: String,
    #[validate(length(min = 1, max = 100, message = "Option D must be 1-100 characters"))]
    option_d: String,
    correct_answer: String,
    #[serde(default = "default_true")]
    is_active: bool,
}

#[post("/quizzes", data = "<quiz>")]
pub async fn api_create_quiz(
    quiz: Json<QuizCreateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let validated = quiz.validate_custom()?;

    let id = create_quiz(
        db,
        validated.lesson_id,
        &validated.question,
        &validated.option_a,
        &validated.option_b,
        &validated.option_c,
        &validated.option_d,
        &validated.correct_answer,
        validated.is_active,
    )
    .await
    .validate_custom()?;

    Ok(Custom(Status::Created, Json(CreatedResponse { id })))
}

#[derive(Deserialize)]
pub struct QuizUpdateRequest {
    question: Option<String>,
    option_a: Option<String>,
    option_b: Option<String>,
    option_c: Option<String>,
    option_d: Option<String>,
    correct_answer: Option<String>,
    is_active: Option<bool>,
}

#[put("/quizzes/<id>", data = "<update>")]
pub async fn api_update_quiz(
    id: i64,
    update: Json<QuizUpdateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let existing = get_quiz_row(db, id).await.validate_custom()?;

    let question = update.question.clone().unwrap_or(existing.question);
    let option_a = update.option_a.clone().unwrap_or(existing.option_a);
    let option_b = update.option_b.clone().unwrap_or(existing.option_b);
    let option_c = update.option_c.clone().unwrap_or(existing.option_c);
    let option_d = update.option_d.clone().unwrap_or(existing.option_d);
    let correct_answer = update
        .correct_answer
        .clone()
        .unwrap_or(existing.correct_answer);
    let is_active = update.is_active.unwrap_or(existing.is_active);

    update_quiz(
        db,
        id,
        &question,
        &option_a,
        &option_b,
        &option_c,
        &option_d,
        &correct_answer,
        is_active,
    )
    .await
    .validate_custom()?;

    Ok(Status::Ok)
}

#[delete("/quizzes/<id>")]
pub async fn api_delete_quiz(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    user.require_permission(Permission::ManageContent)?;

    delete_quiz(db, id).await?;

    Ok(Status::NoContent)
}
