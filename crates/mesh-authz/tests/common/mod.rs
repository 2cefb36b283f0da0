#![allow(dead_code)]

use async_trait::async_trait;
use mesh_authz::{
    AccessStore, Actor, ActorId, ClientId, ExternalClient, Group, GroupId, LookupError,
    LookupResult, NetworkId, Role, RoleId,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Fixture store that counts every lookup it serves.
#[derive(Default)]
pub struct FixtureStore {
    actors: HashMap<ActorId, Actor>,
    roles: HashMap<RoleId, Role>,
    groups: HashMap<GroupId, Group>,
    clients: HashMap<(NetworkId, ClientId), ExternalClient>,
    unavailable_roles: Vec<RoleId>,
    lookups: Mutex<Vec<String>>,
}

impl FixtureStore {
    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actors.insert(actor.actor_id.clone(), actor);
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role.role_id.clone(), role);
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.insert(group.group_id.clone(), group);
        self
    }

    pub fn with_client(mut self, client_id: &str, network_id: &str, owner: &str) -> Self {
        let client = ExternalClient {
            client_id: ClientId::new(client_id),
            network_id: NetworkId::new(network_id),
            owner_id: ActorId::new(owner),
        };
        self.clients.insert(
            (client.network_id.clone(), client.client_id.clone()),
            client,
        );
        self
    }

    pub fn with_unavailable_role(mut self, role_id: &str) -> Self {
        self.unavailable_roles.push(RoleId::new(role_id));
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("lookups").clone()
    }

    fn record(&self, entry: String) {
        self.lookups.lock().expect("lookups").push(entry);
    }
}

#[async_trait]
impl AccessStore for FixtureStore {
    async fn fetch_actor(&self, actor_id: &ActorId) -> LookupResult<Actor> {
        self.record(format!("actor:{actor_id}"));
        self.actors
            .get(actor_id)
            .cloned()
            .ok_or_else(|| LookupError::not_found("actor", actor_id.as_str()))
    }

    async fn fetch_role(&self, role_id: &RoleId) -> LookupResult<Role> {
        self.record(format!("role:{role_id}"));
        if self.unavailable_roles.contains(role_id) {
            return Err(LookupError::Unavailable("role backend down".to_string()));
        }
        self.roles
            .get(role_id)
            .cloned()
            .ok_or_else(|| LookupError::not_found("role", role_id.as_str()))
    }

    async fn fetch_group(&self, group_id: &GroupId) -> LookupResult<Group> {
        self.record(format!("group:{group_id}"));
        self.groups
            .get(group_id)
            .cloned()
            .ok_or_else(|| LookupError::not_found("group", group_id.as_str()))
    }

    async fn fetch_external_client(
        &self,
        client_id: &ClientId,
        network_id: &NetworkId,
    ) -> LookupResult<ExternalClient> {
        self.record(format!("client:{network_id}/{client_id}"));
        self.clients
            .get(&(network_id.clone(), client_id.clone()))
            .cloned()
            .ok_or_else(|| LookupError::not_found("external client", client_id.as_str()))
    }
}
