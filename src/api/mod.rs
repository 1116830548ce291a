pub mod account;
pub mod games;
pub mod learning;
pub mod messaging;
pub mod progress;
pub mod site;
pub mod social;

pub use account::*;
pub use games::*;
pub use learning::*;
pub use messaging::*;
pub use progress::*;
pub use site::*;
pub use social::*;

use serde::{Deserialize, Serialize};

/// Body returned by every create endpoint.
#[derive(Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

pub(crate) fn default_true() -> bool {
    true
}

#[get("/health")]
pub fn health() -> &'static str {
    "OK"
}
