//! Infrastructure layer: storage backends, counter stores, services

pub mod account;
pub mod api_key;
pub mod counter;
pub mod logging;
pub mod rate_limit;
