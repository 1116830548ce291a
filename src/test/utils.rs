use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Once;

use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::json;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::api::LoginResponse;
use crate::auth::Role;
use crate::db::{create_chapter, create_lesson, create_user};
use crate::error::AppError;

static INIT: Once = Once::new();
pub static STANDARD_PASSWORD: &str = "password123";

pub struct TestUser {
    pub username: String,
    pub display_name: Option<String>,
    pub role: Role,
    pub password: String,
}

pub struct TestChapter {
    pub title: String,
    pub order: i64,
    pub published: bool,
}

pub struct TestLesson {
    pub chapter_title: String,
    pub title: String,
    pub order: i64,
    pub published: bool,
}

#[derive(Default)]
pub struct TestDbBuilder {
    users: Vec<TestUser>,
    chapters: Vec<TestChapter>,
    lessons: Vec<TestLesson>,
}

impl TestDbBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn user(mut self, username: &str, role: Role) -> Self {
        self.users.push(TestUser {
            username: username.to_string(),
            display_name: None,
            role,
            password: STANDARD_PASSWORD.to_string(),
        });
        self
    }

    pub fn student(self, username: &str) -> Self {
        self.user(username, Role::Student)
    }

    pub fn staff(self, username: &str) -> Self {
        self.user(username, Role::Staff)
    }

    pub fn admin(self, username: &str) -> Self {
        self.user(username, Role::Admin)
    }

    pub fn chapter(mut self, title: &str, order: i64, published: bool) -> Self {
        self.chapters.push(TestChapter {
            title: title.to_string(),
            order,
            published,
        });
        self
    }

    pub fn lesson(mut self, chapter_title: &str, title: &str, order: i64, published: bool) -> Self {
        self.lessons.push(TestLesson {
            chapter_title: chapter_title.to_string(),
            title: title.to_string(),
            order,
            published,
        });
        self
    }

    pub async fn build(self) -> Result<TestDb, AppError> {
        INIT.call_once(|| {
            let _ = env_logger::builder().is_test(true).try_init();
        });

        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let mut user_id_map: HashMap<String, i64> = HashMap::new();
        let mut chapter_id_map: HashMap<String, i64> = HashMap::new();
        let mut lesson_id_map: HashMap<String, i64> = HashMap::new();

        for user in &self.users {
            let user_id = create_user(
                &pool,
                &user.username,
                &user.password,
                user.role.as_str(),
                user.display_name.as_deref(),
            )
            .await?;

            user_id_map.insert(user.username.clone(), user_id);
        }

        let creator = self
            .users
            .iter()
            .find(|u| u.role.is_staff())
            .map(|u| user_id_map[&u.username]);

        for chapter in &self.chapters {
            let chapter_id = create_chapter(
                &pool,
                &chapter.title,
                "",
                chapter.order,
                chapter.published,
                creator,
            )
            .await?;

            chapter_id_map.insert(chapter.title.clone(), chapter_id);
        }

        for lesson in &self.lessons {
            let chapter_id = chapter_id_map
                .get(&lesson.chapter_title)
                .copied()
                .ok_or_else(|| {
                    AppError::NotFound(format!("Chapter {} not in fixture", lesson.chapter_title))
                })?;

            let lesson_id = create_lesson(
                &pool,
                chapter_id,
                &lesson.title,
                "",
                None,
                lesson.order,
                lesson.published,
                creator,
            )
            .await?;

            lesson_id_map.insert(lesson.title.clone(), lesson_id);
        }

        Ok(TestDb {
            pool,
            user_id_map,
            chapter_id_map,
            lesson_id_map,
        })
    }
}

pub struct TestDb {
    pub pool: Pool<Sqlite>,
    pub user_id_map: HashMap<String, i64>,
    pub chapter_id_map: HashMap<String, i64>,
    pub lesson_id_map: HashMap<String, i64>,
}

impl TestDb {
    pub fn user_id(&self, username: &str) -> Option<i64> {
        self.user_id_map.get(username).copied()
    }

    pub fn chapter_id(&self, title: &str) -> Option<i64> {
        self.chapter_id_map.get(title).copied()
    }

    pub fn lesson_id(&self, title: &str) -> Option<i64> {
        self.lesson_id_map.get(title).copied()
    }
}

pub async fn create_standard_test_db() -> TestDb {
    TestDbBuilder::new()
        .admin("admin_user")
        .staff("staff_user")
        .student("student_user")
        .student("other_student")
        .chapter("Getting Started", 1, true)
        .lesson("Getting Started", "Greetings", 1, true)
        .build()
        .await
        .expect("Failed to build test DB")
}

/// Tracked clients carry the session cookie between requests, so a login
/// here authenticates everything that follows until logout.
pub async fn setup_test_client(test_db: TestDb) -> (Client, TestDb) {
    let rocket = crate::init_rocket(test_db.pool.clone()).await;
    let client = Client::tracked(rocket)
        .await
        .expect("valid rocket instance");

    (client, test_db)
}

pub async fn login(client: &Client, username: &str) {
    let response = client
        .post("/api/login")
        .header(ContentType::JSON)
        .body(
            json!({
                "username": username,
                "password": STANDARD_PASSWORD
            })
            .to_string(),
        )
        .dispatch()
        .await;

    assert_eq!(response.status(), Status::Ok);

    let body = response.into_string().await.unwrap();
    let login_response: LoginResponse = serde_json::from_str(&body).unwrap();

    assert!(login_response.success, "Login failed for {}", username);
}

pub async fn logout(client: &Client) {
    let response = client.post("/api/logout").dispatch().await;
    assert_eq!(response.status(), Status::NoContent);
}
