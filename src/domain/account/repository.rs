//! Account repository trait definition

use async_trait::async_trait;

use super::entity::{Account, OwnerId};
use crate::domain::DomainError;

/// Read-only view of accounts maintained by the upstream auth collaborator
#[async_trait]
pub trait AccountRepository: Send + Sync + std::fmt::Debug {
    /// Look up an account by owner id
    async fn get(&self, id: &OwnerId) -> Result<Option<Account>, DomainError>;
}
