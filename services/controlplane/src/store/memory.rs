//! In-memory implementation of the control-plane store.
//!
//! # Purpose
//! Holds actors, roles, groups, and external clients in `HashMap`s guarded by
//! `tokio::sync::RwLock`. Used for local development, tests, and deployments
//! seeded from a YAML file at startup.
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - Reads take a read lock per lookup, so a request never observes a
//!   half-written record; upserts replace whole records.
//! - Nothing here caches evaluation results.
use super::{ControlPlaneStore, StoreResult};
use async_trait::async_trait;
use mesh_authz::{
    AccessStore, Actor, ActorId, ClientId, ExternalClient, Group, GroupId, LookupError,
    LookupResult, NetworkId, Role, RoleId,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryStore {
    /// Actors keyed by actor id.
    actors: Arc<RwLock<HashMap<ActorId, Actor>>>,
    /// Platform and network roles keyed by role id.
    roles: Arc<RwLock<HashMap<RoleId, Role>>>,
    groups: Arc<RwLock<HashMap<GroupId, Group>>>,
    /// External clients keyed by `(network, client)`; ids are only unique
    /// within a network.
    external_clients: Arc<RwLock<HashMap<(NetworkId, ClientId), ExternalClient>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccessStore for InMemoryStore {
    async fn fetch_actor(&self, actor_id: &ActorId) -> LookupResult<Actor> {
        self.actors
            .read()
            .await
            .get(actor_id)
            .cloned()
            .ok_or_else(|| LookupError::not_found("actor", actor_id.as_str()))
    }

    async fn fetch_role(&self, role_id: &RoleId) -> LookupResult<Role> {
        self.roles
            .read()
            .await
            .get(role_id)
            .cloned()
            .ok_or_else(|| LookupError::not_found("role", role_id.as_str()))
    }

    async fn fetch_group(&self, group_id: &GroupId) -> LookupResult<Group> {
        self.groups
            .read()
            .await
            .get(group_id)
            .cloned()
            .ok_or_else(|| LookupError::not_found("group", group_id.as_str()))
    }

    async fn fetch_external_client(
        &self,
        client_id: &ClientId,
        network_id: &NetworkId,
    ) -> LookupResult<ExternalClient> {
        let key = (network_id.clone(), client_id.clone());
        self.external_clients
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(|| LookupError::not_found("external client", client_id.as_str()))
    }
}

#[async_trait]
impl ControlPlaneStore for InMemoryStore {
    async fn upsert_actor(&self, actor: Actor) -> StoreResult<Actor> {
        let mut actors = self.actors.write().await;
        actors.insert(actor.actor_id.clone(), actor.clone());
        Ok(actor)
    }

    async fn upsert_role(&self, role: Role) -> StoreResult<Role> {
        let mut roles = self.roles.write().await;
        roles.insert(role.role_id.clone(), role.clone());
        Ok(role)
    }

    async fn upsert_group(&self, group: Group) -> StoreResult<Group> {
        let mut groups = self.groups.write().await;
        groups.insert(group.group_id.clone(), group.clone());
        Ok(group)
    }

    async fn upsert_external_client(&self, client: ExternalClient) -> StoreResult<ExternalClient> {
        let mut clients = self.external_clients.write().await;
        clients.insert(
            (client.network_id.clone(), client.client_id.clone()),
            client.clone(),
        );
        Ok(client)
    }

    async fn health_check(&self) -> StoreResult<()> {
        // In-memory backend is always healthy while the process runs.
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
