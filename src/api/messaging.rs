use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::Deserialize;
use sqlx::{Pool, Sqlite};
use validator::Validate;

use crate::auth::User;
use crate::db::{
    create_message, create_thread, get_message, get_messages_for_thread, get_thread,
    get_threads_for_user, mark_message_read,
};
use crate::error::AppError;
use crate::models::{Message, Thread};
use crate::validation::{
    AppErrorExt, JsonValidateExt, ToValidationResponse, ValidationResponse,
};

use super::CreatedResponse;

// Threads are private to their two participants.

#[get("/threads")]
pub async fn api_get_threads(
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<Thread>>, Status> {
    let threads = get_threads_for_user(db, user.id).await?;

    Ok(Json(threads))
}

#[derive(Deserialize, Validate)]
pub struct ThreadCreateRequest {
    #[validate(range(min = 1, message = "User id must be positive"))]
    user_id: i64,
}

#[post("/threads", data = "<thread>")]
pub async fn api_create_thread(
    thread: Json<ThreadCreateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    let validated = thread.validate_custom()?;

    if validated.user_id == user.id {
        return Err(
            AppError::Validation("Cannot start a thread with yourself".to_string())
                .to_validation_response(),
        );
    }

    let id = create_thread(db, user.id, validated.user_id)
        .await
        .validate_custom()?;

    Ok(Custom(Status::Created, Json(CreatedResponse { id })))
}

#[get("/threads/<id>/messages")]
pub async fn api_get_thread_messages(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<Message>>, Status> {
    let thread = get_thread(db, id).await?;

    if !thread.has_participant(user.id) {
        return Err(Status::Forbidden);
    }

    let messages = get_messages_for_thread(db, id).await?;

    Ok(Json(messages))
}

#[derive(Deserialize, Validate)]
pub struct MessageCreateRequest {
    #[validate(length(min = 1, message = "Body is required"))]
    body: String,
}

#[post("/threads/<id>/messages", data = "<message>")]
pub async fn api_create_message(
    id: i64,
    message: Json<MessageCreateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    let validated = message.validate_custom()?;

    let thread = get_thread(db, id).await.validate_custom()?;

    if !thread.has_participant(user.id) {
        return Err(Status::Forbidden.to_validation_response());
    }

    let message_id = create_message(db, id, user.id, &validated.body)
        .await
        .validate_custom()?;

    Ok(Custom(
        Status::Created,
        Json(CreatedResponse { id: message_id }),
    ))
}

#[put("/messages/<id>/read")]
pub async fn api_mark_message_read(
    id: i64,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    let message = get_message(db, id).await?;
    let thread = get_thread(db, message.thread_id).await?;

    if !thread.has_participant(user.id) {
        return Err(Status::Forbidden);
    }

    mark_message_read(db, id).await?;

    Ok(Status::Ok)
}
