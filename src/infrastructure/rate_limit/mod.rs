//! Rate limiting infrastructure

pub mod limiter;

pub use limiter::{Admission, RateLimiter};
