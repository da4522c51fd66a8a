//! Rate limiting domain
//!
//! Identities, route classes, and the declarative policy table that
//! parameterizes admission decisions.

mod identity;
mod policy;

pub use identity::Identity;
pub use policy::{KeyingStrategy, PolicyTable, RateLimitPolicy, RouteClass};
