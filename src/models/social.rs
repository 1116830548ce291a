use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use super::utc;

#[derive(Serialize, Clone)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub commenter_id: i64,
    pub commenter_username: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbComment {
    pub id: i64,
    pub post_id: i64,
    pub commenter_id: i64,
    pub commenter_username: String, // Joined from users
    pub body: String,
    pub timestamp: NaiveDateTime,
}

impl From<DbComment> for Comment {
    fn from(comment: DbComment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            commenter_id: comment.commenter_id,
            commenter_username: comment.commenter_username,
            body: comment.body,
            timestamp: utc(comment.timestamp),
        }
    }
}

#[derive(Serialize, Clone)]
pub struct Post {
    pub id: i64,
    pub author_id: i64,
    pub author_username: String,
    pub title: String,
    pub body: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub comments: Vec<Comment>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbPost {
    pub id: i64,
    pub author_id: i64,
    pub author_username: String, // Joined from users
    pub title: String,
    pub body: String,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<DbPost> for Post {
    fn from(post: DbPost) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            author_username: post.author_username,
            title: post.title,
            body: post.body,
            is_published: post.is_published,
            created_at: utc(post.created_at),
            updated_at: utc(post.updated_at),
            comments: Vec::new(),
        }
    }
}
