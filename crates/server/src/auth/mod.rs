pub mod middleware;
pub mod token;

pub use middleware::{CurrentUser, OptionalUser, SessionUser};
pub use token::{issue_token, Claims};
