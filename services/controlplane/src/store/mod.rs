//! Storage for the records the authorization engine reads.
//!
//! # Purpose
//! Extends the engine's read-only [`AccessStore`] with the write and health
//! operations the service needs to seed and operate a backend.
use async_trait::async_trait;
use mesh_authz::{AccessStore, Actor, ExternalClient, Group, LookupError, Role};
use thiserror::Error;

pub mod memory;
pub mod seed;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<LookupError> for StoreError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::NotFound { .. } => StoreError::NotFound(err.to_string()),
            LookupError::Unavailable(message) => StoreError::Unexpected(anyhow::anyhow!(message)),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ControlPlaneStore: AccessStore {
    async fn upsert_actor(&self, actor: Actor) -> StoreResult<Actor>;
    async fn upsert_role(&self, role: Role) -> StoreResult<Role>;
    async fn upsert_group(&self, group: Group) -> StoreResult<Group>;
    async fn upsert_external_client(&self, client: ExternalClient) -> StoreResult<ExternalClient>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_errors_map_to_store_errors() {
        let missing: StoreError = LookupError::not_found("actor", "alice").into();
        assert!(matches!(missing, StoreError::NotFound(message) if message == "actor alice not found"));

        let down: StoreError = LookupError::Unavailable("timeout".to_string()).into();
        assert!(matches!(down, StoreError::Unexpected(_)));
        assert_eq!(down.to_string(), "timeout");
    }
}
