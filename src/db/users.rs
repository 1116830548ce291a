use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::auth::{DbUser, User};
use crate::error::{AppError, conflict_on_unique};
use crate::models::{DbProfile, Profile};

#[instrument(skip_all, fields(username, role))]
pub async fn create_user(
    pool: &Pool<Sqlite>,
    username: &str,
    password: &str,
    role: &str,
    display_name: Option<&str>,
) -> Result<i64, AppError> {
    info!("Creating new user");

    let hashed_password = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;

    let res = sqlx::query(
        "INSERT INTO users (username, password, display_name, role) VALUES (?, ?, ?, ?)",
    )
    .bind(username)
    .bind(hashed_password)
    .bind(display_name.unwrap_or(username))
    .bind(role)
    .execute(pool)
    .await
    .map_err(|e| conflict_on_unique(e, &format!("Username '{}' already exists", username)))?;

    let user_id = res.last_insert_rowid();

    // Every account gets its profile row up front.
    sqlx::query("INSERT INTO profiles (user_id) VALUES (?)")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(user_id)
}

#[instrument]
pub async fn get_user(pool: &Pool<Sqlite>, id: i64) -> Result<User, AppError> {
    let row = sqlx::query_as::<_, DbUser>(
        "SELECT id, username, display_name, role FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(user) => Ok(User::from(user)),
        _ => Err(AppError::NotFound(format!(
            "User with id {} not found in database",
            id
        ))),
    }
}

#[instrument]
pub async fn find_user_by_username(
    pool: &Pool<Sqlite>,
    username: &str,
) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, DbUser>(
        "SELECT id, username, display_name, role FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(User::from))
}

#[instrument(skip_all, fields(username))]
pub async fn authenticate_user(
    pool: &Pool<Sqlite>,
    username: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    info!("Authenticating user");

    let row: Option<(i64, String)> =
        sqlx::query_as("SELECT id, password FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?;

    match row {
        Some((id, hash)) => {
            if bcrypt::verify(password, &hash).unwrap_or(false) {
                Ok(Some(get_user(pool, id).await?))
            } else {
                Ok(None)
            }
        }
        _ => Ok(None),
    }
}

#[instrument]
pub async fn delete_user(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting user");

    let res = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "User with id {} not found in database",
            id
        )));
    }

    Ok(())
}

#[instrument]
pub async fn get_profile_for_user(pool: &Pool<Sqlite>, user_id: i64) -> Result<Profile, AppError> {
    let row = sqlx::query_as::<_, DbProfile>("SELECT * FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(profile) => Ok(Profile::from(profile)),
        _ => Err(AppError::NotFound(format!(
            "Profile for user {} not found",
            user_id
        ))),
    }
}

#[instrument(skip(pool))]
pub async fn update_profile(
    pool: &Pool<Sqlite>,
    user_id: i64,
    bio: &str,
    avatar: Option<&str>,
) -> Result<(), AppError> {
    info!("Updating profile");

    let res = sqlx::query("UPDATE profiles SET bio = ?, avatar = ? WHERE user_id = ?")
        .bind(bio)
        .bind(avatar)
        .bind(user_id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Profile for user {} not found",
            user_id
        )));
    }

    Ok(())
}
