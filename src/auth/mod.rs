pub mod permissions;
pub mod session;
pub mod user;

pub use permissions::*;
pub use session::*;
pub use user::*;
