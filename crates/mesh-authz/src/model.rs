//! Records the authorization engine reads: actors, groups, roles, and
//! externally issued clients.
//!
//! # Purpose
//! These are read-only views of records owned by the management APIs. The
//! engine never mutates them; a request sees one consistent copy.
//!
//! # Key invariants
//! - An actor and a group hold network roles in the same shape, so group
//!   grants are inherited by every member without translation.
//! - `Role::full_access` bypasses every permission table.
//!
//! # Examples
//! ```rust
//! use mesh_authz::{Actor, NetworkId, PermissionScope, ResourceType, Role};
//!
//! let role = Role::new("host-viewer")
//!     .for_network("n1")
//!     .grant_network(ResourceType::Host, ResourceType::Host.wildcard(), PermissionScope::read_only());
//! let actor = Actor::new("alice", "platform-user").with_network_role("n1", "host-viewer");
//! assert!(actor.network_roles[&NetworkId::new("n1")].contains(&role.role_id));
//! ```
use crate::{
    ActorId, ClientId, GroupId, NetworkId, PermissionScope, PermissionTable, ResourceId,
    ResourceType, RoleId,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Role grants keyed by the network they apply to.
pub type NetworkRoles = HashMap<NetworkId, HashSet<RoleId>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub actor_id: ActorId,
    pub platform_role: RoleId,
    #[serde(default)]
    pub network_roles: NetworkRoles,
    #[serde(default)]
    pub groups: HashSet<GroupId>,
}

impl Actor {
    pub fn new(actor_id: impl Into<ActorId>, platform_role: impl Into<RoleId>) -> Self {
        Self {
            actor_id: actor_id.into(),
            platform_role: platform_role.into(),
            network_roles: HashMap::new(),
            groups: HashSet::new(),
        }
    }

    pub fn with_network_role(
        mut self,
        network_id: impl Into<NetworkId>,
        role_id: impl Into<RoleId>,
    ) -> Self {
        self.network_roles
            .entry(network_id.into())
            .or_default()
            .insert(role_id.into());
        self
    }

    pub fn in_group(mut self, group_id: impl Into<GroupId>) -> Self {
        self.groups.insert(group_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub group_id: GroupId,
    #[serde(default)]
    pub network_roles: NetworkRoles,
}

impl Group {
    pub fn new(group_id: impl Into<GroupId>) -> Self {
        Self {
            group_id: group_id.into(),
            network_roles: HashMap::new(),
        }
    }

    pub fn with_network_role(
        mut self,
        network_id: impl Into<NetworkId>,
        role_id: impl Into<RoleId>,
    ) -> Self {
        self.network_roles
            .entry(network_id.into())
            .or_default()
            .insert(role_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub role_id: RoleId,
    #[serde(default)]
    pub full_access: bool,
    /// Set for roles defined inside a single network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<NetworkId>,
    #[serde(default)]
    pub global_level_access: PermissionTable,
    #[serde(default)]
    pub network_level_access: PermissionTable,
}

impl Role {
    pub fn new(role_id: impl Into<RoleId>) -> Self {
        Self {
            role_id: role_id.into(),
            full_access: false,
            network_id: None,
            global_level_access: HashMap::new(),
            network_level_access: HashMap::new(),
        }
    }

    pub fn with_full_access(mut self) -> Self {
        self.full_access = true;
        self
    }

    pub fn for_network(mut self, network_id: impl Into<NetworkId>) -> Self {
        self.network_id = Some(network_id.into());
        self
    }

    pub fn grant_global(
        mut self,
        resource: ResourceType,
        id: impl Into<ResourceId>,
        scope: PermissionScope,
    ) -> Self {
        self.global_level_access
            .entry(resource)
            .or_default()
            .insert(id.into(), scope);
        self
    }

    pub fn grant_network(
        mut self,
        resource: ResourceType,
        id: impl Into<ResourceId>,
        scope: PermissionScope,
    ) -> Self {
        self.network_level_access
            .entry(resource)
            .or_default()
            .insert(id.into(), scope);
        self
    }
}

/// Externally issued client (e.g. a remote-access config) owned by an actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalClient {
    pub client_id: ClientId,
    pub network_id: NetworkId,
    pub owner_id: ActorId,
}

impl ExternalClient {
    pub fn is_owned_by(&self, actor_id: &ActorId) -> bool {
        &self.owner_id == actor_id
    }
}
