use rocket::State;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::Deserialize;
use sqlx::{Pool, Sqlite};
use validator::Validate;

use crate::auth::{Permission, User};
use crate::db::{get_about, get_profile_for_user, update_profile, upsert_about};
use crate::models::{About, Profile};
use crate::validation::{
    AppErrorExt, JsonValidateExt, PermissionCheckExt, ValidationResponse,
};

#[get("/about")]
pub async fn api_get_about(db: &State<Pool<Sqlite>>) -> Result<Json<About>, Status> {
    match get_about(db).await? {
        Some(about) => Ok(Json(about)),
        None => Err(Status::NotFound),
    }
}

#[derive(Deserialize, Validate)]
pub struct AboutUpdateRequest {
    #[validate(length(min = 1, message = "Content is required"))]
    content: String,
    photo: Option<String>,
}

#[put("/about", data = "<about>")]
pub async fn api_update_about(
    about: Json<AboutUpdateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<About>, Custom<Json<ValidationResponse>>> {
    user.require_permission(Permission::ManageContent)
        .validate_custom()?;

    let validated = about.validate_custom()?;

    let about = upsert_about(db, &validated.content, validated.photo.as_deref())
        .await
        .validate_custom()?;

    Ok(Json(about))
}

#[get("/profile")]
pub async fn api_get_profile(
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Json<Profile>, Status> {
    let profile = get_profile_for_user(db, user.id).await?;

    Ok(Json(profile))
}

#[derive(Deserialize)]
pub struct ProfileUpdateRequest {
    bio: Option<String>,
    avatar: Option<String>,
}

#[put("/profile", data = "<update>")]
pub async fn api_update_profile(
    update: Json<ProfileUpdateRequest>,
    user: User,
    db: &State<Pool<Sqlite>>,
) -> Result<Status, Status> {
    let existing = get_profile_for_user(db, user.id).await?;

    let bio = update.bio.clone().unwrap_or(existing.bio);
    let avatar = update.avatar.clone().or(existing.avatar);

    update_profile(db, user.id, &bio, avatar.as_deref()).await?;

    Ok(Status::Ok)
}
