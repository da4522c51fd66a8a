//! API middleware components

pub mod auth;
pub mod rate_limit;
pub mod session;

pub use auth::bearer_token;
pub use rate_limit::{client_address, rate_limit_middleware};
pub use session::{RequireOwner, SESSION_USER_HEADER};
