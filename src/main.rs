#[macro_use]
extern crate rocket;

mod api;
mod auth;
mod db;
mod env;
mod error;
mod models;
mod telemetry;
mod validation;
#[cfg(test)]
mod test;

use std::path::Path;
use std::sync::Mutex;

use rocket::fs::FileServer;
use rocket::{Build, Rocket};
use sqlx::SqlitePool;
use tracing::{error, info};

use api::*;
use auth::unauthorized_api;
use db::clean_expired_sessions;
use telemetry::TelemetryFairing;

static TELEMETRY_GUARD: Mutex<Option<telemetry::OtelGuard>> = Mutex::new(None);

#[launch]
async fn rocket() -> _ {
    if let Err(e) = env::load_environment() {
        eprintln!("Failed to load environment files: {}", e);
    }

    *TELEMETRY_GUARD.lock().expect("telemetry guard lock") = telemetry::init_tracing();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://hanyu.db".to_string());

    let pool = db::connect(&database_url)
        .await
        .expect("Failed to connect to SQLite database");

    let pool_clone = pool.clone();

    tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;

        loop {
            match clean_expired_sessions(&pool_clone).await {
                Ok(count) => {
                    if count > 0 {
                        info!("Cleaned up {} expired sessions", count);
                    }
                }
                Err(e) => {
                    error!("Failed to clean expired sessions: {}", e);
                }
            }

            tokio::time::sleep(tokio::time::Duration::from_secs(3600)).await;
        }
    });

    info!("Running database migrations...");
    match sqlx::migrate!("./migrations").run(&pool).await {
        Ok(_) => info!("Migrations completed successfully"),
        Err(e) => {
            error!("Failed to run migrations: {}", e);
            panic!("Database migration failed: {}", e);
        }
    }

    init_rocket(pool).await
}

pub async fn init_rocket(pool: SqlitePool) -> Rocket<Build> {
    info!("Starting hanyu backend");

    let mut rocket = rocket::build()
        .manage(pool)
        .mount(
            "/api",
            routes![
                // account
                api_login,
                api_logout,
                api_me,
                api_me_unauthorized,
                api_register_user,
                api_delete_user,
                // learning content
                api_get_chapters,
                api_get_chapter,
                api_create_chapter,
                api_update_chapter,
                api_delete_chapter,
                api_get_lessons,
                api_get_lesson,
                api_create_lesson,
                api_update_lesson,
                api_delete_lesson,
                api_create_flashcard,
                api_update_flashcard,
                api_delete_flashcard,
                api_create_quiz,
                api_update_quiz,
                api_delete_quiz,
                // social feed
                api_get_posts,
                api_get_post,
                api_create_post,
                api_update_post,
                api_delete_post,
                api_get_comments,
                api_get_comment,
                api_create_comment,
                api_update_comment,
                api_delete_comment,
                // progress
                api_get_progress,
                api_get_progress_record,
                api_create_progress,
                api_update_progress,
                api_delete_progress,
                // games
                api_get_guess_questions,
                api_create_guess_question,
                api_update_guess_question,
                api_delete_guess_question,
                api_create_choice_option,
                api_update_choice_option,
                api_delete_choice_option,
                api_get_matching_exercises,
                api_create_matching_exercise,
                api_update_matching_exercise,
                api_delete_matching_exercise,
                api_create_matching_pair,
                api_delete_matching_pair,
                api_get_puzzles,
                api_create_puzzle,
                api_update_puzzle,
                api_delete_puzzle,
                api_create_word_tile,
                api_delete_word_tile,
                // messaging
                api_get_threads,
                api_create_thread,
                api_get_thread_messages,
                api_create_message,
                api_mark_message_read,
                // site
                api_get_about,
                api_update_about,
                api_get_profile,
                api_update_profile,
                health,
            ],
        )
        .register("/api", catchers![unauthorized_api])
        .attach(TelemetryFairing);

    // Media files are served as-is, with no access control of their own.
    let media_root = std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "media".to_string());
    if Path::new(&media_root).is_dir() {
        rocket = rocket.mount("/media", FileServer::from(media_root));
    }

    rocket
}
