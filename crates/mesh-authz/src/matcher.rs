//! Matches one network role against a request.
//!
//! # Purpose
//! Decides whether a single role grants the requested operation on the
//! requested resource within a network. The network evaluator ORs this
//! result across every role the actor holds.
//!
//! # Key invariants
//! - `full_access` allows before any table is consulted.
//! - The `all_<type>` wildcard is checked before the concrete id; a wildcard
//!   that does not permit the operation falls through to the concrete id.
//! - Host requests fall back to the remote-access-gateway table and grants.
//! - A `self_only` external-client wildcard requires a recorded ownership
//!   lookup; no record means deny.
use crate::decision::first_decisive;
use crate::operation::check_scope;
use crate::snapshot::ownership_network;
use crate::{
    AccessRequest, ActorId, Decision, DenyReason, NetworkId, OwnershipIndex, ResourceGrants,
    ResourceType, Role, Verdict,
};

/// Request-side inputs shared by every role checked for one request.
#[derive(Debug, Clone, Copy)]
pub struct MatchInput<'a> {
    pub actor_id: &'a ActorId,
    pub request: &'a AccessRequest,
    pub network_id: &'a NetworkId,
    pub ownership: &'a OwnershipIndex,
}

struct RoleMatch<'a> {
    role: &'a Role,
    input: &'a MatchInput<'a>,
    target: Option<ResourceType>,
    grants: Option<&'a ResourceGrants>,
}

const STEPS: [fn(&RoleMatch<'_>) -> Verdict; 6] = [
    full_access,
    grants_present,
    wildcard_grant,
    gateway_grant_for_hosts,
    target_id_present,
    concrete_grant,
];

pub fn match_role(role: &Role, input: &MatchInput<'_>) -> Decision {
    let target = input
        .request
        .target_type
        .as_ref()
        .and_then(|target| target.known());
    let grants = target.and_then(|resource| {
        role.network_level_access.get(&resource).or_else(|| {
            (resource == ResourceType::Host)
                .then(|| {
                    role.network_level_access
                        .get(&ResourceType::RemoteAccessGateway)
                })
                .flatten()
        })
    });
    let state = RoleMatch {
        role,
        input,
        target,
        grants,
    };
    first_decisive(&STEPS, &state, DenyReason::AccessDenied)
}

fn full_access(state: &RoleMatch<'_>) -> Verdict {
    if state.role.full_access {
        Verdict::Allow
    } else {
        Verdict::Inconclusive
    }
}

fn grants_present(state: &RoleMatch<'_>) -> Verdict {
    match state.grants {
        Some(_) => Verdict::Inconclusive,
        None => Verdict::Deny(DenyReason::AccessDenied),
    }
}

fn wildcard_grant(state: &RoleMatch<'_>) -> Verdict {
    let (Some(target), Some(grants)) = (state.target, state.grants) else {
        return Verdict::Inconclusive;
    };
    let Some(scope) = grants.get(&target.wildcard()) else {
        return Verdict::Inconclusive;
    };
    let request = state.input.request;
    if target == ResourceType::ExternalClient && scope.self_only && !request.target_id.is_empty()
    {
        let network_id = ownership_network(state.role, state.input.network_id);
        match state.input.ownership.get(network_id) {
            Some(Ok(true)) => {}
            Some(Ok(false)) | None => return Verdict::Deny(DenyReason::AccessDenied),
            Some(Err(err)) => return Verdict::Deny(DenyReason::Lookup(err.clone())),
        }
    }
    allow_or_continue(check_scope(scope, request.operation))
}

fn gateway_grant_for_hosts(state: &RoleMatch<'_>) -> Verdict {
    if state.target != Some(ResourceType::Host) {
        return Verdict::Inconclusive;
    }
    state
        .grants
        .and_then(|grants| grants.get(&ResourceType::RemoteAccessGateway.wildcard()))
        .map_or(Verdict::Inconclusive, |scope| {
            allow_or_continue(check_scope(scope, state.input.request.operation))
        })
}

fn target_id_present(state: &RoleMatch<'_>) -> Verdict {
    if state.input.request.target_id.is_empty() {
        Verdict::Deny(DenyReason::TargetIdEmpty)
    } else {
        Verdict::Inconclusive
    }
}

fn concrete_grant(state: &RoleMatch<'_>) -> Verdict {
    state
        .grants
        .and_then(|grants| grants.get(state.input.request.target_id.as_str()))
        .map_or(Verdict::Inconclusive, |scope| {
            check_scope(scope, state.input.request.operation).into()
        })
}

fn allow_or_continue(decision: Decision) -> Verdict {
    match decision {
        Decision::Allow => Verdict::Allow,
        Decision::Deny(_) => Verdict::Inconclusive,
    }
}
