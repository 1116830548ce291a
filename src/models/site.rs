use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use super::utc;

#[derive(Serialize, Clone)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub bio: String,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbProfile {
    pub id: i64,
    pub user_id: i64,
    pub bio: String,
    pub avatar: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<DbProfile> for Profile {
    fn from(profile: DbProfile) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            bio: profile.bio,
            avatar: profile.avatar,
            created_at: utc(profile.created_at),
        }
    }
}

#[derive(Serialize, Clone)]
pub struct About {
    pub id: i64,
    pub content: String,
    pub photo: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow, Clone)]
pub struct DbAbout {
    pub id: i64,
    pub content: String,
    pub photo: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl From<DbAbout> for About {
    fn from(about: DbAbout) -> Self {
        Self {
            id: about.id,
            content: about.content,
            photo: about.photo,
            updated_at: utc(about.updated_at),
        }
    }
}
