use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::Deserialize;
use sqlx::{Pool, Sqlite};
use validator::Validate;

use crate::auth::User;
use crate::db::{
    create_comment, create_post, delete_comment, delete_post, get_comment, get_comments,
    get_published_post, get_published_posts, update_comment, update_post,
};
use crate::models::{Comment, Post};
use crate::validation::{AppErrorExt, JsonValidateExt, ValidationResponse};

use super::{CreatedResponse, default_true};

// The feed is members-only in both directions: reads and writes take any
// logged-in account, with no ownership distinction beyond the recorded
// author.

#[get("/posts")]
pub async fn api_get_posts(
    _user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<Post>>, Status> {
    let posts = get_published_posts(db).await?;

    Ok(Json(posts))
}

#[get("/posts/<id>")]
pub async fn api_get_post(
    id: i64,
    _user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Post>, Status> {
    let post = get_published_post(db, id).await?;

    Ok(Json(post))
}

#[derive(Deserialize, Validate)]
pub struct PostCreateRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    title: String,
    #[validate(length(min = 1, message = "Body is required"))]
    body: String,
    #[serde(default = "default_true")]
    is_published: bool,
}

#[post("/posts", data = "<post>")]
pub async fn api_create_post(
    post: Json<PostCreateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    let validated = post.validate_custom()?;

    let id = create_post(
        db,
        user.id,
        &validated.title,
        &validated.body,
        validated.is_published,
    )
    .await
    .validate_custom()?;

    Ok(Custom(Status::Created, Json(CreatedResponse { id })))
}

#[derive(Deserialize)]
pub struct PostUpdateRequest {
    title: Option<String>,
    body: Option<String>,
    is_published: Option<bool>,
}

#[put("/posts/<id>", data = "<update>")]
pub async fn api_update_post(
    id: i64,
    update: Json<PostUpdateRequest>,
    _user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    let existing = get_published_post(db, id).await?;

    let title = update.title.clone().unwrap_or(existing.title);
    let body = update.body.clone().unwrap_or(existing.body);
    let is_published = update.is_published.unwrap_or(existing.is_published);

    update_post(db, id, &title, &body, is_published).await?;

    Ok(Status::Ok)
}

#[delete("/posts/<id>")]
pub async fn api_delete_post(
    id: i64,
    _user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    get_published_post(db, id).await?;
    delete_post(db, id).await?;

    Ok(Status::NoContent)
}

#[get("/comments")]
pub async fn api_get_comments(
    _user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Vec<Comment>>, Status> {
    let comments = get_comments(db).await?;

    Ok(Json(comments))
}

#[get("/comments/<id>")]
pub async fn api_get_comment(
    id: i64,
    _user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Comment>, Status> {
    let comment = get_comment(db, id).await?;

    Ok(Json(comment))
}

#[derive(Deserialize, Validate)]
pub struct CommentCreateRequest {
    post_id: i64,
    #[validate(length(min = 1, message = "Body is required"))]
    body: String,
}

#[post("/comments", data = "<comment>")]
pub async fn api_create_comment(
    comment: Json<CommentCreateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Custom<Json<CreatedResponse>>, Custom<Json<ValidationResponse>>> {
    let validated = comment.validate_custom()?;

    let id = create_comment(db, validated.post_id, user.id, &validated.body)
        .await
        .validate_custom()?;

    Ok(Custom(Status::Created, Json(CreatedResponse { id })))
}

#[derive(Deserialize, Validate)]
pub struct CommentUpdateRequest {
    #[validate(length(min = 1, message = "Body is required"))]
    body: String,
}

#[put("/comments/<id>", data = "<update>")]
pub async fn api_update_comment(
    id: i64,
    update: Json<CommentUpdateRequest>,
    _user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Custom<Json<ValidationResponse>>> {
    let validated = update.validate_custom()?;

    update_comment(db, id, &validated.body)
        .await
        .validate_custom()?;

    Ok(Status::Ok)
}

#[delete("/comments/<id>")]
pub async fn api_delete_comment(
    id: i64,
    _user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    delete_comment(db, id).await?;

    Ok(Status::NoContent)
}
