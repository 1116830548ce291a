use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use super::utc;

#[derive(Serialize, Clone)]
pub struct Thread {
    pub id: i64,
    pub user1_id: i64,
    pub user2_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbThread {
    pub id: i64,
    pub user1_id: i64,
    pub user2_id: i64,
    pub created_at: NaiveDateTime,
}

impl From<DbThread> for Thread {
    fn from(thread: DbThread) -> Self {
        Self {
            id: thread.id,
            user1_id: thread.user1_id,
            user2_id: thread.user2_id,
            created_at: utc(thread.created_at),
        }
    }
}

impl Thread {
    pub fn has_participant(&self, user_id: i64) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }
}

#[derive(Serialize, Clone)]
pub struct Message {
    pub id: i64,
    pub thread_id: i64,
    pub sender_id: i64,
    pub sender_username: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub is_read: bool,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbMessage {
    pub id: i64,
    pub thread_id: i64,
    pub sender_id: i64,
    pub sender_username: String, // Joined from users
    pub body: String,
    pub timestamp: NaiveDateTime,
    pub is_read: bool,
}

impl From<DbMessage> for Message {
    fn from(message: DbMessage) -> Self {
        Self {
            id: message.id,
            thread_id: message.thread_id,
            sender_id: message.sender_id,
            sender_username: message.sender_username,
            body: message.body,
            timestamp: utc(message.timestamp),
            is_read: message.is_read,
        }
    }
}
