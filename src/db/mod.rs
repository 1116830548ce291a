pub mod games;
pub mod learning;
pub mod messaging;
pub mod progress;
pub mod sessions;
pub mod site;
pub mod social;
pub mod users;

pub use games::*;
pub use learning::*;
pub use messaging::*;
pub use progress::*;
pub use sessions::*;
pub use site::*;
pub use social::*;
pub use users::*;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::error::AppError;

/// SQLite ships with foreign keys off; cascade and set-null deletes depend
/// on them.
pub async fn connect(database_url: &str) -> Result<Pool<Sqlite>, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new().connect_with(options).await?;

    Ok(pool)
}
