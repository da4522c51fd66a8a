//! Account domain
//!
//! Minimal view of the accounts owned by the external auth/billing layers:
//! public identity attributes plus the subscription plan that parameterizes
//! key quotas.

mod entity;
mod repository;

pub use entity::{Account, OwnerId, Plan, PlanQuotas};
pub use repository::AccountRepository;
