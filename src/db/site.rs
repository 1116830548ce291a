use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::models::{About, DbAbout};

#[instrument]
pub async fn get_about(pool: &Pool<Sqlite>) -> Result<Option<About>, AppError> {
    let row = sqlx::query_as::<_, DbAbout>("SELECT * FROM about ORDER BY id LIMIT 1")
        .fetch_optional(pool)
        .await?;

    Ok(row.map(About::from))
}

/// Singleton-style record: the first write creates it, later writes replace
/// its content.
#[instrument(skip(pool, content))]
pub async fn upsert_about(
    pool: &Pool<Sqlite>,
    content: &str,
    photo: Option<&str>,
) -> Result<About, AppError> {
    info!("Updating about page");

    let now = chrono::Utc::now().naive_utc();

    match get_about(pool).await? {
        Some(existing) => {
            sqlx::query("UPDATE about SET content = ?, photo = ?, updated_at = ? WHERE id = ?")
                .bind(content)
                .bind(photo)
                .bind(now)
                .bind(existing.id)
                .execute(pool)
                .await?;
        }
        None => {
            sqlx::query("INSERT INTO about (content, photo) VALUES (?, ?)")
                .bind(content)
                .bind(photo)
                .execute(pool)
                .await?;
        }
    }

    match get_about(pool).await? {
        Some(about) => Ok(about),
        None => Err(AppError::Internal("About record vanished".to_string())),
    }
}
