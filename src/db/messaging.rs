use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::{AppError, conflict_on_unique};
use crate::models::{DbMessage, DbThread, Message, Thread};

#[instrument]
pub async fn get_threads_for_user(
    pool: &Pool<Sqlite>,
    user_id: i64,
) -> Result<Vec<Thread>, AppError> {
    let rows = sqlx::query_as::<_, DbThread>(
        "SELECT * FROM threads WHERE user1_id = ? OR user2_id = ? ORDER BY created_at DESC",
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Thread::from).collect())
}

#[instrument]
pub async fn get_thread(pool: &Pool<Sqlite>, id: i64) -> Result<Thread, AppError> {
    let row = sqlx::query_as::<_, DbThread>("SELECT * FROM threads WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(thread) => Ok(Thread::from(thread)),
        _ => Err(AppError::NotFound(format!("Thread {} not found", id))),
    }
}

#[instrument(skip(pool))]
pub async fn create_thread(
    pool: &Pool<Sqlite>,
    user1_id: i64,
    user2_id: i64,
) -> Result<i64, AppError> {
    info!("Creating thread");

    let other: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
        .bind(user2_id)
        .fetch_optional(pool)
        .await?;
    if other.is_none() {
        return Err(AppError::Validation(format!(
            "User {} does not exist",
            user2_id
        )));
    }

    let res = sqlx::query("INSERT INTO threads (user1_id, user2_id) VALUES (?, ?)")
        .bind(user1_id)
        .bind(user2_id)
        .execute(pool)
        .await
        .map_err(|e| conflict_on_unique(e, "A thread between these users already exists"))?;

    Ok(res.last_insert_rowid())
}

#[instrument]
pub async fn get_messages_for_thread(
    pool: &Pool<Sqlite>,
    thread_id: i64,
) -> Result<Vec<Message>, AppError> {
    let rows = sqlx::query_as::<_, DbMessage>(
        "SELECT m.*, u.username AS sender_username
         FROM messages m JOIN users u ON u.id = m.sender_id
         WHERE m.thread_id = ?
         ORDER BY m.timestamp",
    )
    .bind(thread_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Message::from).collect())
}

#[instrument]
pub async fn get_message(pool: &Pool<Sqlite>, id: i64) -> Result<Message, AppError> {
    let row = sqlx::query_as::<_, DbMessage>(
        "SELECT m.*, u.username AS sender_username
         FROM messages m JOIN users u ON u.id = m.sender_id
         WHERE m.id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(message) => Ok(Message::from(message)),
        _ => Err(AppError::NotFound(format!("Message {} not found", id))),
    }
}

#[instrument(skip(pool, body))]
pub async fn create_message(
    pool: &Pool<Sqlite>,
    thread_id: i64,
    sender_id: i64,
    body: &str,
) -> Result<i64, AppError> {
    info!("Creating message");

    let res = sqlx::query("INSERT INTO messages (thread_id, sender_id, body) VALUES (?, ?, ?)")
        .bind(thread_id)
        .bind(sender_id)
        .bind(body)
        .execute(pool)
        .await?;

    Ok(res.last_insert_rowid())
}

#[instrument]
pub async fn mark_message_read(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Marking message read");

    let res = sqlx::query("UPDATE messages SET is_read = 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Message {} not found", id)));
    }

    Ok(())
}
