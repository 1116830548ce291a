pub mod games;
pub mod learning;
pub mod messaging;
pub mod progress;
pub mod site;
pub mod social;

pub use games::*;
pub use learning::*;
pub use messaging::*;
pub use progress::*;
pub use site::*;
pub use social::*;

use chrono::{DateTime, NaiveDateTime, Utc};

/// Timestamps are stored naive (UTC) and exposed as RFC 3339.
pub(crate) fn utc(dt: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(dt, Utc)
}
