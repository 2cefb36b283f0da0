//! Per-request view of every record an evaluation needs.
//!
//! # Purpose
//! [`AccessSnapshot::resolve`] performs all store reads for one request up
//! front so the evaluators stay synchronous and side-effect free.
//!
//! # Key invariants
//! - The actor, its platform role, each group, and each distinct role are
//!   fetched at most once per request.
//! - Roles and groups that fail to load are skipped; they can never grant.
//! - External clients are fetched only when a candidate role carries a
//!   `self_only` wildcard for external clients and the request names an id.
use crate::{
    AccessRequest, AccessScope, AccessStore, Actor, ActorId, ClientId, DenyReason, LookupError,
    NetworkId, ResourceType, Role, RoleId,
};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Ownership outcomes for the requested external client, keyed by the
/// network the client was looked up in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipIndex {
    entries: HashMap<NetworkId, Result<bool, LookupError>>,
}

impl OwnershipIndex {
    pub fn record(&mut self, network_id: NetworkId, owned: Result<bool, LookupError>) {
        self.entries.insert(network_id, owned);
    }

    /// `None` when no lookup was made for this network.
    pub fn get(&self, network_id: &NetworkId) -> Option<&Result<bool, LookupError>> {
        self.entries.get(network_id)
    }
}

#[derive(Debug, Clone)]
pub struct AccessSnapshot {
    actor_id: ActorId,
    actor: Result<Actor, LookupError>,
    platform_role: Option<Role>,
    direct_roles: Vec<RoleId>,
    group_roles: Vec<RoleId>,
    roles: HashMap<RoleId, Role>,
    ownership: OwnershipIndex,
}

impl AccessSnapshot {
    /// Snapshot over records the caller already holds.
    pub fn new(actor: Actor, platform_role: Option<Role>) -> Self {
        Self {
            actor_id: actor.actor_id.clone(),
            actor: Ok(actor),
            platform_role,
            direct_roles: Vec::new(),
            group_roles: Vec::new(),
            roles: HashMap::new(),
            ownership: OwnershipIndex::default(),
        }
    }

    /// Snapshot for an actor whose record could not be loaded.
    pub fn unresolved(actor_id: ActorId, err: LookupError) -> Self {
        Self {
            actor_id,
            actor: Err(err),
            platform_role: None,
            direct_roles: Vec::new(),
            group_roles: Vec::new(),
            roles: HashMap::new(),
            ownership: OwnershipIndex::default(),
        }
    }

    pub fn with_direct_role(mut self, role: Role) -> Self {
        self.direct_roles.push(role.role_id.clone());
        self.roles.insert(role.role_id.clone(), role);
        self
    }

    pub fn with_group_role(mut self, role: Role) -> Self {
        self.group_roles.push(role.role_id.clone());
        self.roles.insert(role.role_id.clone(), role);
        self
    }

    pub fn with_ownership(
        mut self,
        network_id: impl Into<NetworkId>,
        owned: Result<bool, LookupError>,
    ) -> Self {
        self.ownership.record(network_id.into(), owned);
        self
    }

    /// Load everything `request` can need for `actor_id`.
    ///
    /// Never fails: lookup errors are kept in the snapshot and surface as
    /// denials during evaluation.
    pub async fn resolve(
        store: &dyn AccessStore,
        actor_id: &ActorId,
        request: &AccessRequest,
    ) -> Self {
        let actor = match store.fetch_actor(actor_id).await {
            Ok(actor) => actor,
            Err(err) => {
                tracing::warn!(actor = %actor_id, error = %err, "actor lookup failed");
                return Self::unresolved(actor_id.clone(), err);
            }
        };

        let platform_role = match store.fetch_role(&actor.platform_role).await {
            Ok(role) => Some(role),
            Err(err) => {
                tracing::warn!(
                    actor = %actor_id,
                    role = %actor.platform_role,
                    error = %err,
                    "platform role lookup failed"
                );
                None
            }
        };

        let needs_network_roles = request.scope == AccessScope::Network
            && platform_role.as_ref().is_some_and(|role| !role.full_access)
            && request.target_type.is_some()
            && !request.is_target(ResourceType::Metric);

        let mut snapshot = Self::new(actor, platform_role);
        if let Some(network_id) = request.network_id.as_ref().filter(|_| needs_network_roles) {
            snapshot.load_network_roles(store, network_id).await;
            snapshot.load_ownership(store, request, network_id).await;
        }
        snapshot
    }

    async fn load_network_roles(&mut self, store: &dyn AccessStore, network_id: &NetworkId) {
        let Ok(actor) = &self.actor else {
            return;
        };
        let direct: BTreeSet<RoleId> = actor
            .network_roles
            .get(network_id)
            .map(|roles| roles.iter().cloned().collect())
            .unwrap_or_default();
        let group_ids: BTreeSet<_> = actor.groups.iter().cloned().collect();

        let mut inherited = Vec::new();
        for group_id in &group_ids {
            match store.fetch_group(group_id).await {
                Ok(group) => {
                    let roles: BTreeSet<RoleId> = group
                        .network_roles
                        .get(network_id)
                        .map(|roles| roles.iter().cloned().collect())
                        .unwrap_or_default();
                    inherited.extend(roles);
                }
                Err(err) => {
                    tracing::warn!(group = %group_id, error = %err, "group lookup failed; skipping");
                }
            }
        }

        let mut failed = HashSet::new();
        for role_id in direct.iter().chain(inherited.iter()) {
            if self.roles.contains_key(role_id) || failed.contains(role_id) {
                continue;
            }
            match store.fetch_role(role_id).await {
                Ok(role) => {
                    self.roles.insert(role_id.clone(), role);
                }
                Err(err) => {
                    tracing::warn!(role = %role_id, error = %err, "role lookup failed; skipping");
                    failed.insert(role_id.clone());
                }
            }
        }

        self.direct_roles = direct.into_iter().collect();
        self.group_roles = inherited;
    }

    async fn load_ownership(
        &mut self,
        store: &dyn AccessStore,
        request: &AccessRequest,
        network_id: &NetworkId,
    ) {
        if !request.is_target(ResourceType::ExternalClient) || request.target_id.is_empty() {
            return;
        }
        let wildcard = ResourceType::ExternalClient.wildcard();
        let mut networks = BTreeSet::new();
        for role in self.roles.values() {
            let self_only = role
                .network_level_access
                .get(&ResourceType::ExternalClient)
                .and_then(|grants| grants.get(&wildcard))
                .is_some_and(|scope| scope.self_only);
            if !role.full_access && self_only {
                networks.insert(ownership_network(role, network_id).clone());
            }
        }

        let client_id = ClientId::new(request.target_id.clone());
        for lookup_network in networks {
            let owned = store
                .fetch_external_client(&client_id, &lookup_network)
                .await
                .map(|client| store.is_owner(&self.actor_id, &client));
            if let Err(err) = &owned {
                tracing::warn!(
                    client = %client_id,
                    network = %lookup_network,
                    error = %err,
                    "external client lookup failed"
                );
            }
            self.ownership.record(lookup_network, owned);
        }
    }

    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref().ok()
    }

    /// The actor's platform role, or the reason evaluation must deny.
    pub fn platform_role(&self) -> Result<&Role, DenyReason> {
        match (&self.actor, &self.platform_role) {
            (Err(err), _) => Err(DenyReason::Lookup(err.clone())),
            (Ok(_), None) => Err(DenyReason::AccessDenied),
            (Ok(_), Some(role)) => Ok(role),
        }
    }

    /// Loaded roles granted directly for the requested network.
    pub fn direct_roles(&self) -> impl Iterator<Item = &Role> {
        self.direct_roles.iter().filter_map(|id| self.roles.get(id))
    }

    /// Loaded roles inherited through groups for the requested network.
    pub fn group_roles(&self) -> impl Iterator<Item = &Role> {
        self.group_roles.iter().filter_map(|id| self.roles.get(id))
    }

    pub fn ownership(&self) -> &OwnershipIndex {
        &self.ownership
    }
}

/// Network used to look up an external client for a role: the role's own
/// network, else the network of the request.
pub fn ownership_network<'a>(role: &'a Role, request_network: &'a NetworkId) -> &'a NetworkId {
    role.network_id.as_ref().unwrap_or(request_network)
}
