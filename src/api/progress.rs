use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::Deserialize;
use sqlx::{Pool, Sqlite};
use validator::Validate;

use crate::auth::User;
use crate::db::{
    create_progress, delete_progress, get_progress_for_user, get_progress_record,
    update_progress,
};
use crate::models::LessonProgress;
use crate::validation::{AppErrorExt, JsonValidateExt, ValidationResponse};

use super::CreatedResponse;

// Progress rows are visible to their owner only, and the owner is always
// the requester; the client has no say in it.

#[get("/progress")]
pub async fn api_get_progress(
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<LessonProgress>>, Status> {
    let records = get_progress_for_user(db, user.id).await?;

    Ok(Json(records))
}

#[get("/progress/<id>")]
pub async fn api_get_progress_record(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<LessonProgress>, Status> {
    let record = get_progress_record(db, id, user.id).await?;

    Ok(Json(record))
}

#[derive(Deserialize, Validate)]
pub struct ProgressCreateRequest {
    #[validate(range(min = 1, message = "Lesson id must be positive"))]
    lesson_id: i64,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    score: i64,
}

#[post("/progress", data = "<progress>")]
pub async fn api_create_progress(
    progress: Json<ProgressCreateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    let validated = progress.validate_custom()?;

    let id = create_progress(
        db,
        user.id,
        validated.lesson_id,
        validated.completed,
        validated.score,
    )
    .await
    .validate_custom()?;

    Ok(Custom(Status::Created, Json(CreatedResponse { id })))
}

#[derive(Deserialize)]
pub struct ProgressUpdateRequest {
    completed: Option<bool>,
    score: Option<i64>,
}

#[put("/progress/<id>", data = "<update>")]
pub async fn api_update_progress(
    id: i64,
    update: Json<ProgressUpdateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    let existing = get_progress_record(db, id, user.id).await?;

    let completed = update.completed.unwrap_or(existing.completed);
    let score = update.score.unwrap_or(existing.score);

    update_progress(db, id, user.id, completed, score).await?;

    Ok(Status::Ok)
}

#[delete("/progress/<id>")]
pub async fn api_delete_progress(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    delete_progress(db, id, user.id).await?;

    Ok(Status::NoContent)
}
