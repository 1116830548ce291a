use sqlx::{Pool, Sqlite};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::models::{Comment, DbComment, DbPost, Post};

#[instrument]
pub async fn get_published_posts(pool: &Pool<Sqlite>) -> Result<Vec<Post>, AppError> {
    info!("Listing published posts");

    let rows = sqlx::query_as::<_, DbPost>(
        "SELECT p.*, u.username AS author_username
         FROM posts p JOIN users u ON u.id = p.author_id
         WHERE p.is_published = 1
         ORDER BY p.created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    let mut posts = Vec::with_capacity(rows.len());
    for row in rows {
        let mut post = Post::from(row);
        post.comments = comments_for_post(pool, post.id).await?;
        posts.push(post);
    }

    Ok(posts)
}

#[instrument]
pub async fn get_published_post(pool: &Pool<Sqlite>, id: i64) -> Result<Post, AppError> {
    let row = sqlx::query_as::<_, DbPost>(
        "SELECT p.*, u.username AS author_username
         FROM posts p JOIN users u ON u.id = p.author_id
         WHERE p.id = ? AND p.is_published = 1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let mut post = Post::from(row);
            post.comments = comments_for_post(pool, post.id).await?;
            Ok(post)
        }
        _ => Err(AppError::NotFound(format!("Post {} not found", id))),
    }
}

async fn comments_for_post(pool: &Pool<Sqlite>, post_id: i64) -> Result<Vec<Comment>, AppError> {
    let rows = sqlx::query_as::<_, DbComment>(
        "SELECT c.*, u.username AS commenter_username
         FROM comments c JOIN users u ON u.id = c.commenter_id
         WHERE c.post_id = ?
         ORDER BY c.timestamp",
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Comment::from).collect())
}

#[instrument(skip(pool, body))]
pub async fn create_post(
    pool: &Pool<Sqlite>,
    author_id: i64,
    title: &str,
    body: &str,
    is_published: bool,
) -> Result<i64, AppError> {
    info!("Creating post");

    let res = sqlx::query(
        "INSERT INTO posts (author_id, title, body, is_published) VALUES (?, ?, ?, ?)",
    )
    .bind(author_id)
    .bind(title)
    .bind(body)
    .bind(is_published)
    .execute(pool)
    .await?;

    Ok(res.last_insert_rowid())
}

#[instrument(skip(pool, body))]
pub async fn update_post(
    pool: &Pool<Sqlite>,
    id: i64,
    title: &str,
    body: &str,
    is_published: bool,
) -> Result<(), AppError> {
    info!("Updating post");

    let now = chrono::Utc::now().naive_utc();
    let res = sqlx::query(
        "UPDATE posts SET title = ?, body = ?, is_published = ?, updated_at = ? WHERE id = ?",
    )
    .bind(title)
    .bind(body)
    .bind(is_published)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Post {} not found", id)));
    }

    Ok(())
}

#[instrument]
pub async fn delete_post(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting post");

    let res = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Post {} not found", id)));
    }

    Ok(())
}

#[instrument]
pub async fn get_comments(pool: &Pool<Sqlite>) -> Result<Vec<Comment>, AppError> {
    let rows = sqlx::query_as::<_, DbComment>(
        "SELECT c.*, u.username AS commenter_username
         FROM comments c JOIN users u ON u.id = c.commenter_id
         ORDER BY c.timestamp",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Comment::from).collect())
}

#[instrument]
pub async fn get_comment(pool: &Pool<Sqlite>, id: i64) -> Result<Comment, AppError> {
    let row = sqlx::query_as::<_, DbComment>(
        "SELECT c.*, u.username AS commenter_username
         FROM comments c JOIN users u ON u.id = c.commenter_id
         WHERE c.id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(comment) => Ok(Comment::from(comment)),
        _ => Err(AppError::NotFound(format!("Comment {} not found", id))),
    }
}

#[instrument(skip(pool, body))]
pub async fn create_comment(
    pool: &Pool<Sqlite>,
    post_id: i64,
    commenter_id: i64,
    body: &str,
) -> Result<i64, AppError> {
    info!("Creating comment");

    let post: Option<(i64,)> = sqlx::query_as("SELECT id FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(pool)
        .await?;
    if post.is_none() {
        return Err(AppError::Validation(format!(
            "Post {} does not exist",
            post_id
        )));
    }

    let res = sqlx::query("INSERT INTO comments (post_id, commenter_id, body) VALUES (?, ?, ?)")
        .bind(post_id)
        .bind(commenter_id)
        .bind(body)
        .execute(pool)
        .await?;

    Ok(res.last_insert_rowid())
}

#[instrument(skip(pool, body))]
pub async fn update_comment(pool: &Pool<Sqlite>, id: i64, body: &str) -> Result<(), AppError> {
    info!("Updating comment");

    let res = sqlx::query("UPDATE comments SET body = ? WHERE id = ?")
        .bind(body)
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Comment {} not found", id)));
    }

    Ok(())
}

#[instrument]
pub async fn delete_comment(pool: &Pool<Sqlite>, id: i64) -> Result<(), AppError> {
    info!("Deleting comment");

    let res = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if res.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Comment {} not found", id)));
    }

    Ok(())
}
