//! Global (platform-wide) permission evaluation.
//!
//! Only the actor's platform role is consulted. Rules run in order and the
//! first decisive rule wins; a wildcard grant is final and never falls
//! through to the concrete id.
use crate::decision::first_decisive;
use crate::operation::check_scope;
use crate::{
    AccessRequest, AccessSnapshot, ActorId, Decision, DenyReason, Operation, ResourceType, Role,
    Verdict,
};

struct GlobalCheck<'a> {
    actor_id: &'a ActorId,
    role: &'a Role,
    request: &'a AccessRequest,
}

const RULES: [fn(&GlobalCheck<'_>) -> Verdict; 9] = [
    full_access,
    target_present,
    metrics_always_allowed,
    host_listing,
    own_user_record,
    table_present,
    wildcard_grant,
    target_id_present,
    concrete_grant,
];

pub fn evaluate(snapshot: &AccessSnapshot, request: &AccessRequest) -> Decision {
    let role = match snapshot.platform_role() {
        Ok(role) => role,
        Err(reason) => return Decision::Deny(reason),
    };
    let check = GlobalCheck {
        actor_id: snapshot.actor_id(),
        role,
        request,
    };
    first_decisive(&RULES, &check, DenyReason::AccessDenied)
}

fn full_access(check: &GlobalCheck<'_>) -> Verdict {
    if check.role.full_access {
        Verdict::Allow
    } else {
        Verdict::Inconclusive
    }
}

fn target_present(check: &GlobalCheck<'_>) -> Verdict {
    match check.request.target_type {
        Some(_) => Verdict::Inconclusive,
        None => Verdict::Deny(DenyReason::TargetTypeMissing),
    }
}

fn metrics_always_allowed(check: &GlobalCheck<'_>) -> Verdict {
    if check.request.is_target(ResourceType::Metric) {
        Verdict::Allow
    } else {
        Verdict::Inconclusive
    }
}

fn host_listing(check: &GlobalCheck<'_>) -> Verdict {
    let request = check.request;
    if request.is_target(ResourceType::Host)
        && request.operation == Operation::Read
        && request.target_id.is_empty()
    {
        Verdict::Allow
    } else {
        Verdict::Inconclusive
    }
}

fn own_user_record(check: &GlobalCheck<'_>) -> Verdict {
    let request = check.request;
    if request.is_target(ResourceType::User)
        && request.target_id == check.actor_id.as_str()
        && request.operation != Operation::Delete
    {
        Verdict::Allow
    } else {
        Verdict::Inconclusive
    }
}

fn table_present(check: &GlobalCheck<'_>) -> Verdict {
    let Some(target) = &check.request.target_type else {
        return Verdict::Inconclusive;
    };
    let present = target
        .known()
        .is_some_and(|resource| check.role.global_level_access.contains_key(&resource));
    if present {
        Verdict::Inconclusive
    } else {
        Verdict::Deny(DenyReason::ResourceTypeDenied(target.as_str().to_string()))
    }
}

fn wildcard_grant(check: &GlobalCheck<'_>) -> Verdict {
    grant_for(check, |resource| resource.wildcard().to_string())
}

fn target_id_present(check: &GlobalCheck<'_>) -> Verdict {
    if check.request.target_id.is_empty() {
        Verdict::Deny(DenyReason::TargetIdMissing)
    } else {
        Verdict::Inconclusive
    }
}

fn concrete_grant(check: &GlobalCheck<'_>) -> Verdict {
    grant_for(check, |_| check.request.target_id.clone())
}

fn grant_for(check: &GlobalCheck<'_>, key: impl FnOnce(ResourceType) -> String) -> Verdict {
    let Some(resource) = check
        .request
        .target_type
        .as_ref()
        .and_then(|target| target.known())
    else {
        return Verdict::Inconclusive;
    };
    check
        .role
        .global_level_access
        .get(&resource)
        .and_then(|grants| grants.get(key(resource).as_str()))
        .map_or(Verdict::Inconclusive, |scope| {
            check_scope(scope, check.request.operation).into()
        })
}
